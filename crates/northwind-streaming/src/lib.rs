//! Streaming primitives for shell-first rendering.
//!
//! - `StreamingSink` - Shell-first chunked output over any `Sink<Vec<u8>>`
//! - `Shell` / `HeadContent` - Document chrome around the regions
//! - `Region` - Named page region with a loading placeholder and swap markup
//! - `escape_html` - Text escaping for interpolated values

mod escape;
mod region;
mod shell;
mod sink;

pub use escape::*;
pub use region::*;
pub use shell::*;
pub use sink::*;
