use gloo_storage::{LocalStorage, Storage};
use shop_client::{CartItem, CartStorage, ShopClientError};

/// `localStorage` key holding the cart, the same JSON array the page has always used.
pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageCart;

impl CartStorage for LocalStorageCart {
    fn load(&self) -> Result<Vec<CartItem>, ShopClientError> {
        match LocalStorage::get::<Vec<CartItem>>(CART_KEY) {
            Ok(items) => Ok(items),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(ShopClientError::Storage(e.to_string())),
        }
    }

    fn save(&self, items: &[CartItem]) -> Result<(), ShopClientError> {
        LocalStorage::set(CART_KEY, items).map_err(|e| ShopClientError::Storage(e.to_string()))
    }
}
