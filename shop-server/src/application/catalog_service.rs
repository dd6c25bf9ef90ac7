use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::data::product_repository::ProductRepository;
use crate::domain::{error::DomainError, product::Product};
use crate::infrastructure::seed::load_products;

/// Import that failed partway. `inserted` rows were written before the failure.
#[derive(Debug, Error)]
#[error("import stopped after {inserted} new products: {source}")]
pub struct ImportError {
    pub inserted: usize,
    #[source]
    pub source: DomainError,
}

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list().await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(id.to_string()))
    }

    /// Inserts products whose id is not stored yet. Existing rows are left untouched.
    pub async fn import(&self, products: &[Product]) -> Result<usize, ImportError> {
        let mut inserted = 0;
        for product in products {
            match self.repo.insert_if_absent(product).await {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(source) => return Err(ImportError { inserted, source }),
            }
        }
        Ok(inserted)
    }

    /// Startup seeding. Problems with the seed file are logged and never abort startup.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn seed_from_file(&self, path: impl AsRef<Path>) -> usize {
        let products = match load_products(path.as_ref()).await {
            Ok(products) => products,
            Err(err) => {
                warn!(error = %err, "could not import products");
                return 0;
            }
        };

        match self.import(&products).await {
            Ok(inserted) => {
                info!(inserted, total = products.len(), "catalog seeded");
                inserted
            }
            Err(err) => {
                warn!(error = %err.source, inserted = err.inserted, "catalog seeding stopped early");
                err.inserted
            }
        }
    }
}
