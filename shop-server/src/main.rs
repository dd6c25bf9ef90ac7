mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use std::sync::Arc;

use application::auth_service::AuthService;
use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use data::order_repository::PostgresOrderRepository;
use data::product_repository::PostgresProductRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use server::{AppServices, start_http_server};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let product_repo = Arc::new(PostgresProductRepository::new(pool.clone()));
    let order_repo = Arc::new(PostgresOrderRepository::new(pool.clone()));

    let services = AppServices {
        auth: AuthService::new(user_repo, JwtKeys::new(config.jwt_secret.clone())),
        catalog: CatalogService::new(product_repo),
        orders: OrderService::new(order_repo),
    };

    let seeded = services.catalog.seed_from_file(&config.seed_file).await;
    info!(seeded, "startup import finished");

    start_http_server(config, services).await
}
