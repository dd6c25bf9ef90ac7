use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/users").service(register).service(login)
}

#[post("/register")]
async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let RegisterRequest {
        username,
        password,
        email,
    } = payload.into_inner();

    let user = service
        .register(
            username.as_deref().unwrap_or_default(),
            password.as_deref().unwrap_or_default(),
            email.as_deref().unwrap_or_default(),
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        username = %user.username,
        "user registered"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let session = service
        .login(
            payload.username.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %session.username,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: session.token,
        username: session.username,
    }))
}
