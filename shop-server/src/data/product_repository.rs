use crate::domain::error::DomainError;
use crate::domain::product::Product;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    /// Inserts the product unless its id is already present. Returns whether a row was written.
    async fn insert_if_absent(&self, product: &Product) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, image
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching products: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, image
            FROM products WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn insert_if_absent(&self, product: &Product) -> Result<bool, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO products (id, name, price, description, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to seed product {}: {}", product.id, e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if inserted.rows_affected() == 0 {
            debug!(product_id = product.id, "product already present, skipped");
        }
        Ok(inserted.rows_affected() > 0)
    }
}
