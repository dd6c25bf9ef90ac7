use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopClientError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[cfg(feature = "http")]
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

impl ShopClientError {
    /// Maps a non-success status and the server's `{"message": ...}` body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.to_string());
        match status {
            401 | 403 => ShopClientError::Unauthorized,
            404 => ShopClientError::NotFound,
            _ => ShopClientError::Http { status, message },
        }
    }
}
