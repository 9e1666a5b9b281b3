//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open database: {0}")]
    OpenError(String),

    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// A row did not match the requested type.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::QueryError(e.to_string())
    }
}
