use crate::client::{ShopClientWeb, TOKEN_KEY, USERNAME_KEY};
use crate::storage::LocalStorageCart;
use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::future::TimeoutFuture;
use shop_client::cart::EMPTY_CART_MESSAGE;
use shop_client::{Cart, Product, ShopClientError, ShopClientTrait};

mod client;
mod storage;

const BASE_URL: &str = "http://127.0.0.1:8080";

type ShopCart = Cart<LocalStorageCart>;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
        #[route("/")]
        Home {},
        #[route("/product/:id")]
        ProductDetail { id: i64 },
        #[route("/cart")]
        CartPage {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const TOAST_MS: u32 = 2_000;

/// Short notification shown at the bottom of the page.
#[derive(Clone, Copy)]
struct Toast(Signal<Option<String>>);

impl Toast {
    fn show(self, message: impl Into<String>) {
        let mut slot = self.0;
        slot.set(Some(message.into()));
    }

    fn dismiss(self) {
        let mut slot = self.0;
        slot.set(None);
    }
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let token = use_signal(ShopClientWeb::stored_token);
    let cart = use_signal(|| Cart::load(LocalStorageCart));
    let toast = use_signal(|| None::<String>);

    provide_context(token);
    provide_context(cart);
    provide_context(Toast(toast));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

fn add_product(cart: &mut Signal<ShopCart>, toast: Toast, product: &Product) {
    match cart.write().add_product(product) {
        Ok(()) => toast.show(format!("\"{}\" successfully added to cart!", product.name)),
        Err(err) => toast.show(format!("Could not update cart: {err}")),
    }
}

fn change_qty(cart: &mut Signal<ShopCart>, toast: Toast, index: usize, delta: i64) {
    if let Err(err) = cart.write().change_qty(index, delta) {
        toast.show(format!("Could not update cart: {err}"));
    }
}

fn remove_line(cart: &mut Signal<ShopCart>, toast: Toast, index: usize) {
    if let Err(err) = cart.write().remove_from_cart(index) {
        toast.show(format!("Could not update cart: {err}"));
    }
}

fn excerpt(text: &str) -> String {
    let short: String = text.chars().take(50).collect();
    format!("{short}...")
}

#[component]
fn Home() -> Element {
    let products = use_resource(move || async move {
        ShopClientWeb::new(BASE_URL, None).list_products().await
    });

    rsx! {
        div { class: "container",
            h1 { "Products" }
            match products.read().as_ref() {
                Some(Ok(products)) if !products.is_empty() => rsx! {
                    div { id: "product-list", class: "product-grid",
                        for product in products.iter().cloned() {
                            ProductCard { key: "{product.id}", product }
                        }
                    }
                },
                Some(Ok(_)) => rsx! { p { class: "muted", "No products yet." } },
                Some(Err(e)) => rsx! { p { class: "error", "Error: {e}" } },
                None => rsx! { p { class: "muted", "Loading products..." } },
            }
        }
    }
}

#[component]
fn ProductCard(product: Product) -> Element {
    let mut cart = use_context::<Signal<ShopCart>>();
    let toast = use_context::<Toast>();
    let to_add = product.clone();
    let summary = excerpt(&product.description);

    rsx! {
        div { class: "product-card",
            img { src: "{product.image}", alt: "{product.name}" }
            h3 { "{product.name}" }
            p { "{summary}" }
            p { b { "₹{product.price}" } }
            Link { to: Route::ProductDetail { id: product.id }, class: "button", "View" }
            button { onclick: move |_| add_product(&mut cart, toast, &to_add), "Add to Cart" }
        }
    }
}

#[component]
fn ProductDetail(id: i64) -> Element {
    let mut cart = use_context::<Signal<ShopCart>>();
    let toast = use_context::<Toast>();

    let product = use_resource(move || async move {
        ShopClientWeb::new(BASE_URL, None).get_product(id).await
    });

    rsx! {
        div { id: "product-details", class: "container",
            match product.read().as_ref() {
                Some(Ok(p)) => {
                    let to_add = p.clone();
                    rsx! {
                        img { src: "{p.image}", alt: "{p.name}", class: "detail-image" }
                        h2 { "{p.name}" }
                        p { "{p.description}" }
                        p { b { "Price: ₹{p.price}" } }
                        button { onclick: move |_| add_product(&mut cart, toast, &to_add), "Add to Cart" }
                    }
                }
                Some(Err(ShopClientError::NotFound)) => rsx! { p { class: "error", "Product not found" } },
                Some(Err(e)) => rsx! { p { class: "error", "Error: {e}" } },
                None => rsx! { p { class: "muted", "Loading..." } },
            }
        }
    }
}

#[component]
fn CartPage() -> Element {
    let mut cart = use_context::<Signal<ShopCart>>();
    let token = use_context::<Signal<Option<String>>>();
    let toast = use_context::<Toast>();
    let navigator = use_navigator();
    let mut placing = use_signal(|| false);

    let on_place_order = move |_| {
        if cart.read().is_empty() {
            toast.show("Cart empty");
            return;
        }
        let Some(token) = token.read().clone() else {
            toast.show("Please log in to place your order");
            navigator.push(Route::Login {});
            return;
        };
        let lines = cart.read().order_lines();
        placing.set(true);

        spawn(async move {
            let client = ShopClientWeb::new(BASE_URL, Some(token));
            match client.place_order(&lines).await {
                Ok(receipt) => {
                    if let Err(err) = cart.write().clear() {
                        toast.show(format!("Order placed, but the cart could not be cleared: {err}"));
                    } else {
                        toast.show(format!("Order placed! (#{})", receipt.order_id));
                    }
                    navigator.push(Route::Home {});
                }
                Err(ShopClientError::Unauthorized) => {
                    toast.show("Session expired, please log in again");
                    navigator.push(Route::Login {});
                }
                Err(err) => toast.show(format!("Order failed: {err}")),
            }
            placing.set(false);
        });
    };

    let items = cart.read().items().to_vec();
    let total_line = cart.read().total_line();

    rsx! {
        div { class: "container",
            h1 { "Your Cart" }
            div { id: "cart-items",
                if items.is_empty() {
                    p { "{EMPTY_CART_MESSAGE}" }
                } else {
                    for (idx, item) in items.into_iter().enumerate() {
                        div { key: "{item.id}", class: "cart-item",
                            div {
                                img { src: "{item.image}", alt: "{item.name}", class: "thumb" }
                                span { "{item.name} - ₹{item.price} x {item.quantity}" }
                            }
                            div {
                                button { onclick: move |_| change_qty(&mut cart, toast, idx, -1), "-" }
                                button { onclick: move |_| change_qty(&mut cart, toast, idx, 1), "+" }
                                button { onclick: move |_| remove_line(&mut cart, toast, idx), "Remove" }
                            }
                        }
                    }
                }
            }
            if let Some(total) = total_line {
                p { id: "cart-total", b { "{total}" } }
            }
            button {
                id: "place-order",
                onclick: on_place_order,
                disabled: *placing.read(),
                "Place Order"
            }
        }
    }
}

#[component]
fn Login() -> Element {
    let mut token_sig = use_context::<Signal<Option<String>>>();
    let toast = use_context::<Toast>();
    let navigator = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let username = username.read().clone();
        let password = password.read().clone();
        spawn(async move {
            let mut client = ShopClientWeb::new(BASE_URL, None);
            match client.login(username, password).await {
                Ok(session) => {
                    token_sig.set(Some(session.token));
                    toast.show(format!("Logged in as {}", session.username));
                    navigator.push(Route::Home {});
                }
                Err(ShopClientError::Http { message, .. }) => error.set(Some(message)),
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    rsx! {
        div { class: "container narrow",
            h1 { "Login" }
            form { onsubmit: on_submit,
                input {
                    r#type: "text",
                    placeholder: "Username",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error.read().as_ref() {
                    p { class: "error", "{message}" }
                }
                button {
                    r#type: "submit",
                    disabled: username.read().trim().is_empty() || password.read().is_empty(),
                    "Login"
                }
            }
            Link { to: Route::Register {}, "Don't have an account? Register" }
        }
    }
}

#[component]
fn Register() -> Element {
    let toast = use_context::<Toast>();
    let navigator = use_navigator();

    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let username = username.read().clone();
        let email = email.read().clone();
        let password = password.read().clone();
        spawn(async move {
            let mut client = ShopClientWeb::new(BASE_URL, None);
            match client.register(username, password, email).await {
                Ok(user) => {
                    toast.show(format!("Welcome, {}! Please log in.", user.username));
                    navigator.push(Route::Login {});
                }
                Err(ShopClientError::Http { message, .. }) => error.set(Some(message)),
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    rsx! {
        div { class: "container narrow",
            h1 { "Create Account" }
            form { onsubmit: on_submit,
                input {
                    r#type: "text",
                    placeholder: "Username",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value().trim().to_string()),
                    required: true,
                }
                input {
                    r#type: "email",
                    placeholder: "you@example.com",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value().trim().to_string()),
                    required: true,
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                    required: true,
                }
                if let Some(message) = error.read().as_ref() {
                    p { class: "error", "{message}" }
                }
                button {
                    r#type: "submit",
                    disabled: {
                        let u = username.read();
                        let e = email.read();
                        let p = password.read();
                        u.is_empty() || e.is_empty() || p.is_empty()
                    },
                    "Register"
                }
            }
            Link { to: Route::Login {}, "Already have an account? Log in" }
        }
    }
}

#[component]
fn Navbar() -> Element {
    let mut token = use_context::<Signal<Option<String>>>();
    let cart = use_context::<Signal<ShopCart>>();
    let toast = use_context::<Toast>();
    let navigator = use_navigator();

    let username = LocalStorage::get::<String>(USERNAME_KEY).unwrap_or_default();
    let count = cart.read().item_count();

    // Hide each toast after a while unless a newer one replaced it.
    use_effect(move || {
        let Some(shown) = toast.0.read().clone() else {
            return;
        };
        spawn(async move {
            TimeoutFuture::new(TOAST_MS).await;
            if toast.0.peek().as_deref() == Some(shown.as_str()) {
                toast.dismiss();
            }
        });
    });

    let on_logout = move |_| {
        LocalStorage::delete(TOKEN_KEY);
        LocalStorage::delete(USERNAME_KEY);
        token.set(None);
        navigator.push(Route::Home {});
    };

    rsx! {
        nav { class: "navbar",
            Link { to: Route::Home {}, class: "brand", "Shop" }
            div { class: "nav-links",
                Link { to: Route::CartPage {}, "Cart ({count})" }
                if token.read().is_some() {
                    span { class: "muted", "{username}" }
                    button { onclick: on_logout, "Logout" }
                } else {
                    Link { to: Route::Login {}, "Login" }
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
        Outlet::<Route> {}
        if let Some(message) = toast.0.read().as_ref() {
            div { id: "toast", class: "show", onclick: move |_| toast.dismiss(), "{message}" }
        }
    }
}
