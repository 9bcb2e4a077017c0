//! Error types for gridbook-core

use thiserror::Error;

use crate::sheet::SheetId;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridbook-core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// No sheet with this id exists in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(SheetId),

    /// A snapshot has a shape the workbook cannot be rebuilt from
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A snapshot was written by a newer format version
    #[error("Unsupported snapshot version {found} (max supported: {supported})")]
    UnsupportedSnapshotVersion { found: u32, supported: u32 },
}
