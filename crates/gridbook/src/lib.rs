//! # gridbook
//!
//! A small multi-sheet spreadsheet engine.
//!
//! Gridbook keeps raw cell content per sheet, evaluates formulas on read, and
//! offers linear undo/redo and flat JSON snapshots of the whole workbook.
//!
//! ## Features
//!
//! - Single-letter columns (`A`-`Z`) with `$` absolute markers
//! - Arithmetic formulas over cell references (`=A1*2+B3`)
//! - Range functions: SUM, AVERAGE, COUNT, MAX, MIN, REMOVE_DUPLICATES,
//!   FIND_AND_REPLACE; cell functions: TRIM, UPPER, LOWER
//! - Per-edit undo/redo
//! - Several sheets with stable ids
//!
//! ## Example
//!
//! ```rust
//! use gridbook::prelude::*;
//!
//! let mut session = Session::new();
//! let sheet = session.active_sheet_id();
//!
//! session.commit_cell_edit(sheet, "A1", "1");
//! session.commit_cell_edit(sheet, "A2", "x");
//! session.commit_cell_edit(sheet, "A3", "3");
//! session.commit_cell_edit(sheet, "B1", "=SUM(A1:A3)");
//! assert_eq!(session.get_display_value(sheet, "B1"), "4");
//!
//! session.undo();
//! assert_eq!(session.get_display_value(sheet, "B1"), "");
//! ```

pub mod error;
pub mod options;
pub mod prelude;
pub mod session;

pub use error::{Error, Result};
pub use options::SessionOptions;
pub use session::{HistoryEntry, Session};

// Re-export core types
pub use gridbook_core::{
    CellAddress, CellRange, GridSnapshot, Sheet, SheetId, SheetSnapshot, Workbook,
    WorkbookSnapshot, MAX_COLS, SNAPSHOT_VERSION,
};

// Re-export formula types
pub use gridbook_formula::{
    builtin_function_names, display_value, evaluate_raw, parse_formula, ErrorToken,
    EvaluationContext, EvaluationOptions, FormulaError, FormulaValue,
};
