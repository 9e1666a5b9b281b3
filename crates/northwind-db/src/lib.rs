//! SQLite access layer.
//!
//! One API over two backends: Spin's SQLite host interface inside the
//! component, and `rusqlite` for native builds (the CLI and tests).
//! Rows come back as [`Row`] values that deserialize into any serde type
//! whose field names match the selected columns.
//!
//! ```rust,ignore
//! use northwind_db::{params, Db};
//!
//! #[derive(serde::Deserialize)]
//! struct Shipper {
//!     #[serde(rename = "Id")]
//!     id: i64,
//!     #[serde(rename = "CompanyName")]
//!     company_name: String,
//! }
//!
//! let db = Db::open_in_memory()?;
//! let shippers: Vec<Shipper> = db.query_as(
//!     "SELECT Id, CompanyName FROM Shipper LIMIT ?1",
//!     params![3],
//! )?;
//! ```

mod db;
mod error;
mod types;

pub use db::Db;
pub use error::DbError;
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbError, QueryResult, Row, Value};
}

/// Create a parameter list for SQL queries.
#[macro_export]
macro_rules! params {
    () => {
        &[] as &[$crate::Value]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
