//! Core abstractions for the Northwind streaming browser.
//!
//! This crate provides the fundamental types:
//! - `RequestContext` - Typed request parameters, headers and cookies
//! - `RouteConfig` / `AppManifest` - Route table description
//! - `LifecyclePhase` / `TimingContext` - Request lifecycle tracking
//! - `PageError` - Errors raised while streaming a page

mod config;
mod context;
mod error;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
