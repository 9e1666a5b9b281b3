//! Northwind Traders: a streaming data browser over the Northwind schema.
//!
//! [`App`] resolves the session and route for a request, then streams the
//! page through a [`StreamingSink`](northwind_streaming::StreamingSink).
//! Page data is loaded into a result set that the deferred-fetch
//! orchestrator either awaits in full or hands to the renderer as it
//! settles, depending on the visitor's settings.

pub mod app;
pub mod config;
pub mod error;
pub mod fixture;
pub mod models;
pub mod pages;
pub mod queries;
pub mod render;
pub mod routes;
pub mod views;

pub use app::{App, Reply};
pub use config::{AppConfig, CONFIG_FILE_NAMES};
pub use error::AppError;
pub use render::{stream_page, PageRequest};
pub use routes::{manifest, Route};
