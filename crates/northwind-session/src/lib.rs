//! Sessions and per-session settings.
//!
//! A [`Cache`] stores JSON values in a key-value store (Spin's store inside
//! the component, an in-process map natively). [`Session`] keeps versioned
//! per-session data in it, and [`SettingsStore`] exposes one session's
//! settings map to the page pipeline.

mod error;
mod kv;
mod session;
mod settings;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};
pub use settings::{SettingsMap, SettingsStore};
