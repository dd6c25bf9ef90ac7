use std::sync::Arc;

use tracing::instrument;

use crate::data::order_repository::OrderRepository;
use crate::domain::{
    error::DomainError,
    order::{OrderLine, PlacedOrder},
    user::Identity,
};

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Stores one order for `identity` with one item per line. Prices and stock are not checked.
    #[instrument(skip(self, lines), fields(user_id = identity.id, lines = lines.len()))]
    pub async fn place_order(
        &self,
        identity: &Identity,
        lines: &[OrderLine],
    ) -> Result<PlacedOrder, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::Validation("No items in order".to_string()));
        }
        if let Some(bad) = lines.iter().find(|line| line.quantity <= 0) {
            return Err(DomainError::Validation(format!(
                "quantity for product {} must be positive",
                bad.product_id
            )));
        }

        self.repo.create(identity.id, lines).await
    }
}
