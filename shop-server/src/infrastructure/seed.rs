use std::path::Path;

use crate::domain::product::Product;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("cannot read seed file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse seed file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Reads the static product list used to populate the catalog.
pub async fn load_products(path: impl AsRef<Path>) -> Result<Vec<Product>, SeedError> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path).await.map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| SeedError::Parse {
        path: path.display().to_string(),
        source,
    })
}
