use clap::{Parser, Subcommand};
use shop_client::{Cart, FileCartStorage, ShopClientHttp, ShopClientTrait, checkout};

const CART_FILE: &str = ".shop_cart.json";

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long)]
    server: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[clap(long)]
        username: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
    },
    /// List the catalog
    Products,
    /// Show one product
    Product { id: i64 },
    /// Manage the local cart
    Cart {
        #[clap(subcommand)]
        action: CartAction,
    },
    /// Send the cart as an order (requires login)
    Checkout,
}

#[derive(Subcommand, Debug)]
enum CartAction {
    /// Print cart lines and total
    Show,
    /// Add one unit of a product
    Add { id: i64 },
    /// Change the quantity of the line at INDEX by DELTA
    Qty {
        index: usize,
        #[clap(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove the line at INDEX
    Remove { index: usize },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:8080");
    let mut client = ShopClientHttp::connect(endpoint)?;
    let mut cart = Cart::load(FileCartStorage::new(CART_FILE));

    match args.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let user = client.register(username, password, email).await?;
            println!("Registered {} (id {})", user.username, user.id);
        }
        Command::Login { username, password } => {
            let session = client.login(username, password).await?;
            println!("Logged in as {}", session.username);
        }
        Command::Products => {
            let products = client.list_products().await?;
            println!("Products ({})", products.len());
            for product in products {
                println!("- {product}");
            }
        }
        Command::Product { id } => {
            let product = client.get_product(id).await?;
            println!("{product}");
            println!("{}", product.description);
        }
        Command::Cart { action } => {
            match action {
                CartAction::Show => {}
                CartAction::Add { id } => {
                    let product = client.get_product(id).await?;
                    cart.add_product(&product)?;
                    println!("\"{}\" successfully added to cart!", product.name);
                }
                CartAction::Qty { index, delta } => cart.change_qty(index, delta)?,
                CartAction::Remove { index } => {
                    let removed = cart.remove_from_cart(index)?;
                    println!("Removed {}", removed.name);
                }
                CartAction::Clear => cart.clear()?,
            }
            println!("{}", cart.render());
        }
        Command::Checkout => {
            let receipt = checkout(&client, &mut cart).await?;
            println!("{} (order #{})", receipt.message, receipt.order_id);
        }
    }

    Ok(())
}
