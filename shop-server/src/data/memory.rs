//! In-memory repositories for service and handler tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::data::order_repository::{OrderRepository, unknown_reference};
use crate::data::product_repository::ProductRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::order::{Order, OrderItem, OrderLine, PlacedOrder};
use crate::domain::product::Product;
use crate::domain::user::{NewUser, User};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DomainError::Conflict("username or email taken".into()));
        }
        let created = User {
            id: users.len() as i64 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct MemoryProductRepository {
    products: Mutex<Vec<Product>>,
    failing_id: Option<i64>,
}

impl MemoryProductRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            failing_id: None,
        }
    }

    /// Inserting the product with `id` fails as if the store went away.
    pub fn failing_on(mut self, id: i64) -> Self {
        self.failing_id = Some(id);
        self
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_if_absent(&self, product: &Product) -> Result<bool, DomainError> {
        if self.failing_id == Some(product.id) {
            return Err(DomainError::Internal("connection reset".into()));
        }
        let mut products = self.products.lock().unwrap();
        if products.iter().any(|p| p.id == product.id) {
            return Ok(false);
        }
        products.push(product.clone());
        Ok(true)
    }
}

/// Order store that only accepts lines for the product ids it was built with,
/// like the foreign key on `order_items.product_id`.
#[derive(Default)]
pub struct MemoryOrderRepository {
    product_ids: HashSet<i64>,
    orders: Mutex<Vec<Order>>,
    items: Mutex<Vec<OrderItem>>,
}

impl MemoryOrderRepository {
    pub fn with_products(product_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            product_ids: product_ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    pub fn items(&self) -> Vec<OrderItem> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create(
        &self,
        user_id: i64,
        lines: &[OrderLine],
    ) -> Result<PlacedOrder, DomainError> {
        if lines
            .iter()
            .any(|line| !self.product_ids.contains(&line.product_id))
        {
            return Err(unknown_reference());
        }

        let mut orders = self.orders.lock().unwrap();
        let mut items = self.items.lock().unwrap();

        let order = Order {
            id: orders.len() as i64 + 1,
            user_id,
            created_at: chrono::Utc::now(),
        };
        orders.push(order.clone());

        let mut written = Vec::with_capacity(lines.len());
        for line in lines {
            let item = OrderItem {
                id: items.len() as i64 + 1,
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
            };
            items.push(item.clone());
            written.push(item);
        }
        Ok(PlacedOrder {
            order,
            items: written,
        })
    }
}
