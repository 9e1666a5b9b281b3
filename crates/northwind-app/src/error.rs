//! Application error type.

use northwind_core::PageError;
use northwind_db::DbError;
use northwind_session::CacheError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Session error: {0}")]
    Session(#[from] CacheError),

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("Configuration error: {0}")]
    Config(String),
}
