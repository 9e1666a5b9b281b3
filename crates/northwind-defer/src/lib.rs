//! Deferred-fetch orchestration.
//!
//! A page loader produces a [`ResultSet`] of named entries, some already
//! resolved and some still in flight. [`maybe_defer`] applies the request's
//! [`RequestSettings`]:
//!
//! - **await mode** blocks until a shared delay timer and every entry have
//!   settled, so the page renders in one piece;
//! - **defer mode** returns at once, with each pending entry rewrapped so
//!   that it settles no earlier than the delay after the call.
//!
//! Timers come from an injected [`Timer`], so the orchestrator does not
//! depend on a particular runtime.

mod entry;
mod orchestrator;
mod settings;
mod settled;
mod timer;

pub use entry::*;
pub use orchestrator::*;
pub use settings::*;
pub use settled::*;
pub use timer::*;
