use crate::application::auth_service::AuthService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::json_config;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub orders: OrderService,
}

/// Registers shared state and the `/api` routes.
pub fn configure_api(services: AppServices) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(json_config())
            .app_data(web::Data::new(services.auth.clone()))
            .app_data(web::Data::new(services.catalog.clone()))
            .app_data(web::Data::new(services.orders.clone()))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::users::scope())
                    .service(handlers::products::scope())
                    .service(
                        web::scope("/order")
                            .wrap(JwtAuthMiddleware::new(services.auth.clone()))
                            .service(handlers::orders::place_order),
                    ),
            );
    }
}

pub async fn start_http_server(config: AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    let serve_static = Path::new(&config.static_dir).is_dir();
    if serve_static {
        info!(dir = %config.static_dir, "serving static assets");
    } else {
        warn!(dir = %config.static_dir, "static asset directory missing, not serving assets");
    }

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);

        let mut app = App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .wrap(cors)
            .configure(configure_api(services.clone()));

        if serve_static {
            app = app.service(Files::new("/", &config.static_dir).index_file("index.html"));
        }
        app
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if config.allows_any_origin() {
        return cors.allow_any_origin();
    }
    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{
        MemoryOrderRepository, MemoryProductRepository, MemoryUserRepository,
    };
    use crate::domain::product::Product;
    use crate::infrastructure::security::JwtKeys;
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use serde_json::{Value, json};
    use std::sync::Arc;

    struct Harness {
        services: AppServices,
        orders: Arc<MemoryOrderRepository>,
    }

    fn harness() -> Harness {
        let users = Arc::new(MemoryUserRepository::default());
        let products = Arc::new(MemoryProductRepository::with_products(vec![
            Product {
                id: 1,
                name: "Mug".into(),
                price: 10.0,
                description: "Ceramic mug".into(),
                image: "mug.png".into(),
            },
            Product {
                id: 2,
                name: "Pen".into(),
                price: 2.5,
                description: "Blue ink".into(),
                image: "pen.png".into(),
            },
        ]));
        let orders = Arc::new(MemoryOrderRepository::with_products([1, 2]));
        let services = AppServices {
            auth: AuthService::new(users, JwtKeys::new("http-test-secret".into())),
            catalog: CatalogService::new(products),
            orders: OrderService::new(orders.clone()),
        };
        Harness { services, orders }
    }

    macro_rules! app {
        ($services:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequestIdMiddleware)
                    .configure(configure_api($services)),
            )
            .await
        };
    }

    macro_rules! register_and_login {
        ($app:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(json!({"username": "alice", "password": "pw123", "email": "a@example.com"}))
                .to_request();
            let resp = test::call_service($app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let req = test::TestRequest::post()
                .uri("/api/users/login")
                .set_json(json!({"username": "alice", "password": "pw123"}))
                .to_request();
            let body: Value = test::call_and_read_body_json($app, req).await;
            assert_eq!(body["username"], "alice");
            body["token"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn register_returns_identity_and_rejects_duplicates() {
        let h = harness();
        let app = app!(h.services);

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({"username": "bob", "password": "pw", "email": "bob@example.com"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "bob");
        assert_eq!(body["email"], "bob@example.com");
        assert!(body["id"].as_i64().is_some());
        assert!(body.get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({"username": "bob", "password": "pw", "email": "other@example.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "username or email taken");
    }

    #[actix_web::test]
    async fn register_with_missing_field_is_bad_request() {
        let h = harness();
        let app = app!(h.services);

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({"username": "bob", "password": "pw"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_bad_request() {
        let h = harness();
        let app = app!(h.services);
        register_and_login!(&app);

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({"username": "alice", "password": "nope"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid credentials");
    }

    #[actix_web::test]
    async fn products_are_listed_and_fetched() {
        let h = harness();
        let app = app!(h.services);

        let req = test::TestRequest::get().uri("/api/products").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let req = test::TestRequest::get().uri("/api/products/2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "Pen");
        assert_eq!(body["price"], 2.5);
    }

    #[actix_web::test]
    async fn unknown_product_is_not_found() {
        let h = harness();
        let app = app!(h.services);

        for uri in ["/api/products/99", "/api/products/abc"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[actix_web::test]
    async fn order_requires_a_token() {
        let h = harness();
        let app = app!(h.services);

        let req = test::TestRequest::post()
            .uri("/api/order")
            .set_json(json!({"items": [{"id": 1, "quantity": 1}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-request-id"));

        let req = test::TestRequest::post()
            .uri("/api/order")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .set_json(json!({"items": [{"id": 1, "quantity": 1}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid token");

        assert!(h.orders.orders().is_empty());
    }

    #[actix_web::test]
    async fn empty_order_is_rejected() {
        let h = harness();
        let app = app!(h.services);
        let token = register_and_login!(&app);

        for payload in [json!({"items": []}), json!({}), json!({"items": "lots"})] {
            let req = test::TestRequest::post()
                .uri("/api/order")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
        assert!(h.orders.orders().is_empty());
        assert!(h.orders.items().is_empty());
    }

    #[actix_web::test]
    async fn authenticated_order_is_stored() {
        let h = harness();
        let app = app!(h.services);
        let token = register_and_login!(&app);

        let req = test::TestRequest::post()
            .uri("/api/order")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"items": [{"id": 1, "quantity": 2}, {"id": 2, "quantity": 1}]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["message"], "Order placed successfully");
        let order_id = body["orderId"].as_i64().unwrap();

        let orders = h.orders.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order_id);
        let items = h.orders.items();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.order_id == order_id));
    }

    #[actix_web::test]
    async fn order_for_unknown_product_is_rejected() {
        let h = harness();
        let app = app!(h.services);
        let token = register_and_login!(&app);

        let req = test::TestRequest::post()
            .uri("/api/order")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"items": [{"id": 999, "quantity": 1}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(h.orders.orders().is_empty());
        assert!(h.orders.items().is_empty());
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let h = harness();
        let app = app!(h.services);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
