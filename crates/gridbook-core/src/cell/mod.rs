//! Cell addressing
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1", "$B$2")
//! - [`CellRange`] - A rectangular span of cells (e.g., "A1:B3")

mod address;

pub use address::{CellAddress, CellRange, CellRangeIterator};
