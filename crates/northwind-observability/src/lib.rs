//! Observability for the Northwind browser.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with request context
//! - `MetricsCollector` - Per-request timing of shell, regions and queries

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Re-exported for convenience
pub use northwind_core::{RequestId, TimingContext};
