use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use gloo_storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde_json::json;
use shop_client::{
    LoginResponse, OrderLine, OrderReceipt, Product, ShopClientError, ShopClientTrait, UserInfo,
};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

fn transport(err: gloo_net::Error) -> ShopClientError {
    ShopClientError::Transport(err.to_string())
}

#[derive(Clone)]
pub struct ShopClientWeb {
    pub base_url: String,
    pub token: Option<String>,
}

impl ShopClientWeb {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn stored_token() -> Option<String> {
        LocalStorage::get::<String>(TOKEN_KEY)
            .ok()
            .filter(|s| !s.is_empty())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: Request) -> Result<T, ShopClientError> {
        let response = request.send().await.map_err(transport)?;

        if response.ok() {
            response.json().await.map_err(transport)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(ShopClientError::from_status(status, &text))
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        Request::get(&self.url(path)).header("Accept", "application/json")
    }
}

#[async_trait(?Send)]
impl ShopClientTrait for ShopClientWeb {
    async fn register(
        &mut self,
        username: String,
        password: String,
        email: String,
    ) -> Result<UserInfo, ShopClientError> {
        let body = json!({
            "username": username,
            "password": password,
            "email": email,
        });
        let request = Request::post(&self.url("/users/register"))
            .json(&body)
            .map_err(transport)?;
        Self::send(request).await
    }

    async fn login(
        &mut self,
        username: String,
        password: String,
    ) -> Result<LoginResponse, ShopClientError> {
        let body = json!({
            "username": username,
            "password": password,
        });
        let request = Request::post(&self.url("/users/login"))
            .json(&body)
            .map_err(transport)?;
        let session: LoginResponse = Self::send(request).await?;

        LocalStorage::set(TOKEN_KEY, &session.token)
            .map_err(|e| ShopClientError::Storage(e.to_string()))?;
        LocalStorage::set(USERNAME_KEY, &session.username)
            .map_err(|e| ShopClientError::Storage(e.to_string()))?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ShopClientError> {
        let request = self.get("/products").build().map_err(transport)?;
        Self::send(request).await
    }

    async fn get_product(&self, id: i64) -> Result<Product, ShopClientError> {
        let request = self
            .get(&format!("/products/{id}"))
            .build()
            .map_err(transport)?;
        Self::send(request).await
    }

    async fn place_order(&self, items: &[OrderLine]) -> Result<OrderReceipt, ShopClientError> {
        let token = self.token.as_deref().ok_or(ShopClientError::Unauthorized)?;
        let request = Request::post(&self.url("/order"))
            .header("Authorization", &format!("Bearer {token}"))
            .json(&json!({ "items": items }))
            .map_err(transport)?;
        Self::send(request).await
    }
}
