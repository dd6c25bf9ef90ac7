//! Client-side shopping cart.
//!
//! The cart is a list of lines kept entirely on the client. Every mutation is written
//! through a [`CartStorage`] backend right away, so a reload sees the same cart. Nothing
//! here talks to the server; checkout sends [`Cart::order_lines`] to the order endpoint.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ShopClientError;
use crate::models::{OrderLine, Product};

pub const EMPTY_CART_MESSAGE: &str = "Cart is empty.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Durable home of the cart lines.
pub trait CartStorage {
    fn load(&self) -> Result<Vec<CartItem>, ShopClientError>;
    fn save(&self, items: &[CartItem]) -> Result<(), ShopClientError>;
}

/// Keeps the serialized cart in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    /// The JSON last written by the cart, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> Result<Vec<CartItem>, ShopClientError> {
        match self.raw() {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| ShopClientError::Storage(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, items: &[CartItem]) -> Result<(), ShopClientError> {
        let raw =
            serde_json::to_string(items).map_err(|e| ShopClientError::Storage(e.to_string()))?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ShopClientError::Storage("cart storage poisoned".into()))?;
        *slot = Some(raw);
        Ok(())
    }
}

/// Stores the cart as a JSON file, e.g. `.shop_cart.json` next to the CLI.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Vec<CartItem>, ShopClientError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ShopClientError::Storage(e.to_string())),
        };
        serde_json::from_str(&raw).map_err(|e| ShopClientError::Storage(e.to_string()))
    }

    fn save(&self, items: &[CartItem]) -> Result<(), ShopClientError> {
        let raw =
            serde_json::to_string(items).map_err(|e| ShopClientError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| ShopClientError::Storage(e.to_string()))
    }
}

pub struct Cart<S: CartStorage> {
    items: Vec<CartItem>,
    storage: S,
}

impl<S: CartStorage> Cart<S> {
    /// Restores the cart from `storage`. Unreadable contents start an empty cart.
    pub fn load(storage: S) -> Self {
        let items = storage.load().unwrap_or_else(|err| {
            warn!(error = %err, "stored cart unreadable, starting empty");
            Vec::new()
        });
        Self { items, storage }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn add_to_cart(
        &mut self,
        id: i64,
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Result<(), ShopClientError> {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(1).ok_or_else(too_large)?
            }
            None => self.items.push(CartItem {
                id,
                name: name.into(),
                price,
                image: image.into(),
                quantity: 1,
            }),
        }
        self.persist()
    }

    pub fn add_product(&mut self, product: &Product) -> Result<(), ShopClientError> {
        self.add_to_cart(
            product.id,
            product.name.clone(),
            product.price,
            product.image.clone(),
        )
    }

    /// Adds `delta` to the line's quantity. A line reaching zero or below is removed.
    pub fn change_qty(&mut self, index: usize, delta: i64) -> Result<(), ShopClientError> {
        let item = self.items.get_mut(index).ok_or_else(|| out_of_range(index))?;
        let quantity = i64::from(item.quantity).saturating_add(delta);
        if quantity <= 0 {
            self.items.remove(index);
        } else {
            item.quantity = u32::try_from(quantity).map_err(|_| too_large())?;
        }
        self.persist()
    }

    pub fn remove_from_cart(&mut self, index: usize) -> Result<CartItem, ShopClientError> {
        if index >= self.items.len() {
            return Err(out_of_range(index));
        }
        let removed = self.items.remove(index);
        self.persist()?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), ShopClientError> {
        self.items.clear();
        self.persist()
    }

    /// Payload for `POST /api/order`.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|item| OrderLine {
                id: item.id,
                quantity: item.quantity,
            })
            .collect()
    }

    /// `Total: ₹<total>` for a cart with lines, whatever their prices.
    pub fn total_line(&self) -> Option<String> {
        (!self.items.is_empty()).then(|| format!("Total: ₹{}", self.total()))
    }

    /// Text rendering: one line per entry plus the running total, or the empty-state message.
    pub fn render(&self) -> String {
        let Some(total) = self.total_line() else {
            return EMPTY_CART_MESSAGE.to_string();
        };
        let mut out = String::new();
        for (idx, item) in self.items.iter().enumerate() {
            out.push_str(&format!(
                "{idx}: {} - ₹{} x {}\n",
                item.name, item.price, item.quantity
            ));
        }
        out.push_str(&total);
        out
    }

    fn persist(&self) -> Result<(), ShopClientError> {
        self.storage.save(&self.items)
    }
}

fn too_large() -> ShopClientError {
    ShopClientError::InvalidRequest("quantity too large".into())
}

fn out_of_range(index: usize) -> ShopClientError {
    ShopClientError::InvalidRequest(format!("no cart line at index {index}"))
}
