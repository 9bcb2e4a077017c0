//! Prelude module - common imports for gridbook users
//!
//! ```rust
//! use gridbook::prelude::*;
//! ```

pub use crate::{
    CellAddress,
    CellRange,
    // Error types
    Error,
    ErrorToken,
    EvaluationOptions,
    Result,
    // Main types
    Session,
    SessionOptions,
    SheetId,
    // Snapshot types
    WorkbookSnapshot,
};
