//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the key-value store.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to open store: {0}")]
    OpenError(String),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Store operation failed: {0}")]
    StoreError(String),
}
