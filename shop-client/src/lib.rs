//! Client side of the shop: API models, the local cart, and the HTTP API surface.

use async_trait::async_trait;

pub mod cart;
mod error;
#[cfg(feature = "http")]
mod http_client;
mod models;

pub use cart::{Cart, CartItem, CartStorage, FileCartStorage, MemoryCartStorage};
pub use error::ShopClientError;
#[cfg(feature = "http")]
pub use http_client::ShopClientHttp;
pub use models::{LoginResponse, OrderLine, OrderReceipt, Product, UserInfo};

#[async_trait(?Send)]
pub trait ShopClientTrait {
    async fn register(
        &mut self,
        username: String,
        password: String,
        email: String,
    ) -> Result<UserInfo, ShopClientError>;
    /// Logs in and keeps the returned token for later order calls.
    async fn login(
        &mut self,
        username: String,
        password: String,
    ) -> Result<LoginResponse, ShopClientError>;
    async fn list_products(&self) -> Result<Vec<Product>, ShopClientError>;
    async fn get_product(&self, id: i64) -> Result<Product, ShopClientError>;
    async fn place_order(&self, items: &[OrderLine]) -> Result<OrderReceipt, ShopClientError>;
}

/// Sends the cart to the order endpoint and empties it once the server accepted the order.
pub async fn checkout<C, S>(client: &C, cart: &mut Cart<S>) -> Result<OrderReceipt, ShopClientError>
where
    C: ShopClientTrait + ?Sized,
    S: CartStorage,
{
    if cart.is_empty() {
        return Err(ShopClientError::InvalidRequest("Cart empty".into()));
    }
    let receipt = client.place_order(&cart.order_lines()).await?;
    cart.clear()?;
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClient {
        orders: RefCell<Vec<Vec<OrderLine>>>,
        fail: bool,
    }

    #[async_trait(?Send)]
    impl ShopClientTrait for RecordingClient {
        async fn register(
            &mut self,
            _username: String,
            _password: String,
            _email: String,
        ) -> Result<UserInfo, ShopClientError> {
            Err(ShopClientError::InvalidRequest("unused".into()))
        }

        async fn login(
            &mut self,
            _username: String,
            _password: String,
        ) -> Result<LoginResponse, ShopClientError> {
            Err(ShopClientError::InvalidRequest("unused".into()))
        }

        async fn list_products(&self) -> Result<Vec<Product>, ShopClientError> {
            Ok(Vec::new())
        }

        async fn get_product(&self, _id: i64) -> Result<Product, ShopClientError> {
            Err(ShopClientError::NotFound)
        }

        async fn place_order(&self, items: &[OrderLine]) -> Result<OrderReceipt, ShopClientError> {
            if self.fail {
                return Err(ShopClientError::Unauthorized);
            }
            self.orders.borrow_mut().push(items.to_vec());
            Ok(OrderReceipt {
                message: "Order placed successfully".into(),
                order_id: 7,
            })
        }
    }

    #[tokio::test]
    async fn checkout_sends_lines_and_clears_cart() {
        let client = RecordingClient::default();
        let mut cart = Cart::load(MemoryCartStorage::default());
        cart.add_to_cart(1, "A", 10.0, "img").unwrap();
        cart.add_to_cart(1, "A", 10.0, "img").unwrap();

        let receipt = checkout(&client, &mut cart).await.unwrap();

        assert_eq!(receipt.order_id, 7);
        assert!(cart.is_empty());
        assert_eq!(
            client.orders.borrow().as_slice(),
            &[vec![OrderLine { id: 1, quantity: 2 }]]
        );
    }

    #[tokio::test]
    async fn empty_cart_never_reaches_the_server() {
        let client = RecordingClient::default();
        let mut cart = Cart::load(MemoryCartStorage::default());

        assert!(checkout(&client, &mut cart).await.is_err());
        assert!(client.orders.borrow().is_empty());
    }

    #[tokio::test]
    async fn rejected_order_keeps_the_cart() {
        let client = RecordingClient {
            fail: true,
            ..Default::default()
        };
        let mut cart = Cart::load(MemoryCartStorage::default());
        cart.add_to_cart(2, "B", 3.0, "img").unwrap();

        assert!(checkout(&client, &mut cart).await.is_err());
        assert_eq!(cart.item_count(), 1);
    }
}
