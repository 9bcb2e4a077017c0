//! # gridbook-core
//!
//! Core data structures for the gridbook spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout gridbook:
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and range expansion
//! - [`Sheet`] - The per-sheet store of raw cell content
//! - [`Workbook`] - The ordered sheet collection with an active-sheet pointer
//! - [`EditHistory`] - Linear undo/redo over snapshots
//! - [`WorkbookSnapshot`] - The flat key-value export/import record
//!
//! ## Example
//!
//! ```rust
//! use gridbook_core::Workbook;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.active_sheet_mut();
//!
//! sheet.commit_at("A1", "Hello").unwrap();
//! sheet.commit_at("B1", "=SUM(A1:A3)").unwrap();
//!
//! assert_eq!(sheet.read_at("A1").unwrap(), Some("Hello"));
//! ```

pub mod cell;
pub mod error;
pub mod history;
pub mod sheet;
pub mod snapshot;
pub mod workbook;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellRangeIterator};
pub use error::{Error, Result};
pub use history::EditHistory;
pub use sheet::{GridSnapshot, Sheet, SheetId};
pub use snapshot::{SheetSnapshot, WorkbookSnapshot, SNAPSHOT_VERSION};
pub use workbook::Workbook;

/// Number of addressable columns (`A` through `Z`)
pub const MAX_COLS: u16 = 26;
