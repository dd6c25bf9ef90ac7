use crate::domain::error::DomainError;
use crate::domain::order::{Order, OrderItem, OrderLine, PlacedOrder};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Writes the order row and all of its item rows; either everything is stored or nothing.
    async fn create(&self, user_id: i64, lines: &[OrderLine]) -> Result<PlacedOrder, DomainError>;
}

#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Error for an order line or owner that does not exist in the store.
pub fn unknown_reference() -> DomainError {
    DomainError::Validation("order references an unknown product or user".to_string())
}

fn map_write_error(e: sqlx::Error) -> DomainError {
    let foreign_key = e
        .as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false);
    if foreign_key {
        unknown_reference()
    } else {
        error!("failed to write order: {}", e);
        DomainError::Internal(format!("database error: {}", e))
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(
        &self,
        user_id: i64,
        lines: &[OrderLine],
    ) -> Result<PlacedOrder, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("failed to open transaction: {}", e);
            DomainError::Internal(e.to_string())
        })?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, order_id, product_id, quantity
                "#,
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_write_error)?;
            items.push(item);
        }

        tx.commit().await.map_err(|e| {
            error!("failed to commit order {}: {}", order.id, e);
            DomainError::Internal(e.to_string())
        })?;

        info!(order_id = order.id, user_id, items = items.len(), "order created");
        Ok(PlacedOrder { order, items })
    }
}
