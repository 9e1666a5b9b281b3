//! Errors raised while producing a page.

/// Error type for page streaming operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Shell not sent before sections")]
    ShellNotSent,

    #[error("Streaming error: {0}")]
    StreamError(String),
}
