use crate::domain::error::DomainError;
use crate::domain::order::OrderLine;
use crate::domain::user::User;
use serde::{Deserialize, Serialize};

// ======================= USERS =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

// ======================= ORDERS =======================

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub id: Option<i64>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Option<Vec<OrderItemRequest>>,
}

impl PlaceOrderRequest {
    pub fn into_lines(self) -> Result<Vec<OrderLine>, DomainError> {
        let items = self
            .items
            .filter(|items| !items.is_empty())
            .ok_or_else(|| DomainError::Validation("No items in order".to_string()))?;

        items
            .into_iter()
            .map(|item| match (item.id, item.quantity) {
                (Some(id), Some(quantity)) => OrderLine::new(id, quantity),
                _ => Err(DomainError::Validation(
                    "every item needs an id and a quantity".to_string(),
                )),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: &'static str,
    #[serde(rename = "orderId")]
    pub order_id: i64,
}
