use crate::error::ShopClientError;
use crate::models::{LoginResponse, OrderLine, OrderReceipt, Product, UserInfo};
use crate::ShopClientTrait;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

const TOKEN_FILE: &str = ".shop_token";

#[derive(Clone)]
pub struct ShopClientHttp {
    client: Client,
    base_url: String,
    token: Option<String>,
    token_file: PathBuf,
}

impl ShopClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, ShopClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        let token_file = PathBuf::from(TOKEN_FILE);
        let token = fs::read_to_string(&token_file)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token,
            token_file,
        })
    }

    /// Keeps the token in memory and in the token file so later invocations stay logged in.
    pub fn set_token(&mut self, token: String) -> Result<(), ShopClientError> {
        fs::write(&self.token_file, &token).map_err(|e| ShopClientError::Storage(e.to_string()))?;
        self.token = Some(token);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ShopClientError> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ShopClientError::from_status(status.as_u16(), &body))
        }
    }
}

#[async_trait(?Send)]
impl ShopClientTrait for ShopClientHttp {
    async fn register(
        &mut self,
        username: String,
        password: String,
        email: String,
    ) -> Result<UserInfo, ShopClientError> {
        let request = self.client.post(self.url("/users/register")).json(&json!({
            "username": username,
            "password": password,
            "email": email,
        }));
        Self::send(request).await
    }

    async fn login(
        &mut self,
        username: String,
        password: String,
    ) -> Result<LoginResponse, ShopClientError> {
        let request = self.client.post(self.url("/users/login")).json(&json!({
            "username": username,
            "password": password,
        }));
        let session: LoginResponse = Self::send(request).await?;
        self.set_token(session.token.clone())?;
        Ok(session)
    }

    async fn list_products(&self) -> Result<Vec<Product>, ShopClientError> {
        Self::send(self.client.get(self.url("/products"))).await
    }

    async fn get_product(&self, id: i64) -> Result<Product, ShopClientError> {
        Self::send(self.client.get(self.url(&format!("/products/{id}")))).await
    }

    async fn place_order(&self, items: &[OrderLine]) -> Result<OrderReceipt, ShopClientError> {
        let token = self.token().ok_or(ShopClientError::Unauthorized)?;
        let request = self
            .client
            .post(self.url("/order"))
            .bearer_auth(token)
            .json(&json!({ "items": items }));
        Self::send(request).await
    }
}
