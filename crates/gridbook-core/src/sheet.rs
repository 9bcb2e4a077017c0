//! Sheet type: the authoritative store of raw cell content

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{CellAddress, CellRange};
use crate::error::Result;

/// Stable identity of a sheet
///
/// Ids are assigned by the [`Workbook`](crate::Workbook) and never change, even when the
/// sheet is renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(pub u32);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable copy of one sheet's address-to-raw-content mapping
///
/// Used as the unit of undo/redo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSnapshot {
    cells: BTreeMap<CellAddress, String>,
}

impl GridSnapshot {
    /// Number of non-empty cells in the snapshot
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the snapshot holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw content recorded for an address
    pub fn get(&self, addr: &CellAddress) -> Option<&str> {
        self.cells.get(&addr.relative()).map(String::as_str)
    }

    /// Iterate over the recorded cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (&CellAddress, &str)> {
        self.cells.iter().map(|(addr, raw)| (addr, raw.as_str()))
    }
}

/// A single sheet in a workbook
///
/// Holds raw content only. Display values are derived on read by the formula
/// evaluator and never written back here.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Immutable identity
    id: SheetId,
    /// Display name (may collide with other sheets)
    name: String,
    /// Non-empty cells keyed by relative address
    cells: BTreeMap<CellAddress, String>,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new<S: Into<String>>(id: SheetId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Get the sheet id
    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Write raw content to a cell
    ///
    /// Content that is empty after trimming removes the cell; anything else is stored
    /// verbatim. Formula text is not validated here.
    pub fn commit<S: Into<String>>(&mut self, addr: CellAddress, raw: S) {
        let raw = raw.into();
        let key = addr.relative();
        if raw.trim().is_empty() {
            if self.cells.remove(&key).is_some() {
                log::trace!("sheet {}: cleared {}", self.id, key);
            }
        } else {
            log::trace!("sheet {}: set {} = {:?}", self.id, key, raw);
            self.cells.insert(key, raw);
        }
    }

    /// Write raw content to a cell by address string (e.g., "A1")
    pub fn commit_at<S: Into<String>>(&mut self, address: &str, raw: S) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.commit(addr, raw);
        Ok(())
    }

    /// Read the raw content of a cell
    pub fn read(&self, addr: &CellAddress) -> Option<&str> {
        self.cells.get(&addr.relative()).map(String::as_str)
    }

    /// Read the raw content of a cell by address string
    pub fn read_at(&self, address: &str) -> Result<Option<&str>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.read(&addr))
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the sheet has no content
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over non-empty cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (&CellAddress, &str)> {
        self.cells.iter().map(|(addr, raw)| (addr, raw.as_str()))
    }

    /// Smallest range covering every non-empty cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        let (mut min_col, mut max_col) = (first.col, first.col);
        let mut max_row = first.row;
        for addr in keys {
            min_col = min_col.min(addr.col);
            max_col = max_col.max(addr.col);
            max_row = max_row.max(addr.row);
        }
        Some(CellRange::new(
            CellAddress::new(first.row, min_col),
            CellAddress::new(max_row, max_col),
        ))
    }

    /// Remove all content
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    // === Snapshots ===

    /// Copy the full mapping
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cells: self.cells.clone(),
        }
    }

    /// Replace the full mapping with a snapshot
    pub fn restore(&mut self, snapshot: GridSnapshot) {
        self.cells = snapshot.cells;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet() -> Sheet {
        Sheet::new(SheetId(1), "Sheet1")
    }

    #[test]
    fn test_commit_and_read() {
        let mut ws = sheet();
        ws.commit_at("A1", "42").unwrap();
        ws.commit_at("B2", "=A1*2").unwrap();

        assert_eq!(ws.read_at("A1").unwrap(), Some("42"));
        assert_eq!(ws.read_at("B2").unwrap(), Some("=A1*2"));
        assert_eq!(ws.read_at("C3").unwrap(), None);
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn test_commit_overwrites() {
        let mut ws = sheet();
        ws.commit_at("A1", "1").unwrap();
        ws.commit_at("A1", "2").unwrap();
        assert_eq!(ws.read_at("A1").unwrap(), Some("2"));
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn test_commit_keeps_surrounding_whitespace() {
        let mut ws = sheet();
        ws.commit_at("A1", "  padded ").unwrap();
        assert_eq!(ws.read_at("A1").unwrap(), Some("  padded "));
    }

    #[test]
    fn test_empty_commit_removes_record() {
        let mut ws = sheet();
        ws.commit_at("A1", "hello").unwrap();
        ws.commit_at("A1", "   ").unwrap();
        assert_eq!(ws.read_at("A1").unwrap(), None);
        assert!(ws.is_empty());

        // Clearing an absent cell is fine
        ws.commit_at("B1", "").unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_absolute_addresses_share_storage() {
        let mut ws = sheet();
        ws.commit_at("$B$2", "x").unwrap();
        assert_eq!(ws.read_at("B2").unwrap(), Some("x"));
        assert_eq!(ws.read_at("$B2").unwrap(), Some("x"));
    }

    #[test]
    fn test_invalid_address() {
        let mut ws = sheet();
        assert!(ws.commit_at("AA1", "x").is_err());
        assert!(ws.read_at("1A").is_err());
        assert!(ws.is_empty());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut ws = sheet();
        ws.commit_at("A1", "1").unwrap();
        let snap = ws.snapshot();

        ws.commit_at("A1", "2").unwrap();
        ws.commit_at("A2", "3").unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get(&CellAddress::new(0, 0)), Some("1"));

        ws.restore(snap);
        assert_eq!(ws.read_at("A1").unwrap(), Some("1"));
        assert_eq!(ws.read_at("A2").unwrap(), None);
    }

    #[test]
    fn test_cells_row_major() {
        let mut ws = sheet();
        ws.commit_at("B2", "d").unwrap();
        ws.commit_at("A2", "c").unwrap();
        ws.commit_at("B1", "b").unwrap();
        ws.commit_at("A1", "a").unwrap();

        let order: Vec<String> = ws.cells().map(|(a, _)| a.to_string()).collect();
        assert_eq!(order, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_used_range() {
        let mut ws = sheet();
        assert_eq!(ws.used_range(), None);

        ws.commit_at("C2", "x").unwrap();
        ws.commit_at("A5", "y").unwrap();
        assert_eq!(ws.used_range().unwrap().to_string(), "A2:C5");
    }
}
