//! Error types for the gridbook session

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`Session`](crate::Session)
///
/// Cell edits and reads never fail; only snapshot import and JSON handling do.
#[derive(Debug, Error)]
pub enum Error {
    /// Structural error from the workbook model
    #[error(transparent)]
    Core(#[from] gridbook_core::Error),

    /// Malformed JSON snapshot or options
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
