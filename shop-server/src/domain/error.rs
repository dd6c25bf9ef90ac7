use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token missing")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("product not found: {0}")]
    ProductNotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_)
            | DomainError::Conflict(_)
            | DomainError::InvalidCredentials => StatusCode::BAD_REQUEST,
            DomainError::MissingToken => StatusCode::UNAUTHORIZED,
            DomainError::InvalidToken => StatusCode::FORBIDDEN,
            DomainError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DomainError::Internal(detail) => {
                error!(detail = %detail, "request failed with internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            DomainError::ProductNotFound(resource) => Some(json!({ "resource": resource })),
            _ => None,
        };
        let body = ErrorBody {
            message: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
