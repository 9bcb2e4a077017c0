//! Cell address and range types

use crate::error::{Error, Result};
use crate::MAX_COLS;
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Columns are a single letter `A`-`Z`, rows are 1-based in text. The optional `$`
/// markers are parsed and kept as flags, but they have no effect on evaluation and
/// are never written back out: formatting always produces the relative form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., Z=25)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create an absolute cell address ($A$1 style)
    pub fn absolute(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: true,
            col_absolute: true,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use gridbook_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 0);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!(addr.row, 1);
    /// assert_eq!(addr.col, 1);
    /// assert!(addr.row_absolute);
    /// assert!(addr.col_absolute);
    ///
    /// assert!(CellAddress::parse("AA1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let mut rest = s;

        let col_absolute = match rest.strip_prefix('$') {
            Some(tail) => {
                rest = tail;
                true
            }
            None => false,
        };

        let mut chars = rest.chars();
        let letter = chars
            .next()
            .ok_or_else(|| Error::InvalidAddress(format!("no column letter in '{}'", s)))?;
        let col = Self::letter_to_column(letter)
            .ok_or_else(|| Error::InvalidAddress(format!("invalid column in '{}'", s)))?;
        rest = chars.as_str();

        let row_absolute = match rest.strip_prefix('$') {
            Some(tail) => {
                rest = tail;
                true
            }
            None => false,
        };

        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = rest
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number out of range in '{}'", s)))?;

        // Rows are 1-based in text, 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Ok(Self {
            row: row - 1,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert a column letter to its index (A = 0, Z = 25)
    ///
    /// Only uppercase ASCII letters are columns.
    pub fn letter_to_column(letter: char) -> Option<u16> {
        if letter.is_ascii_uppercase() {
            Some(letter as u16 - 'A' as u16)
        } else {
            None
        }
    }

    /// Convert a column index to its letter (0 = A, 25 = Z)
    pub fn column_to_letter(col: u16) -> Option<char> {
        if col < MAX_COLS {
            Some((b'A' + col as u8) as char)
        } else {
            None
        }
    }

    /// Format as canonical A1-style string (never includes `$`)
    pub fn to_a1_string(&self) -> String {
        let letter = Self::column_to_letter(self.col).unwrap_or('?');
        format!("{}{}", letter, self.row + 1)
    }

    /// Whether either component carries a `$` marker
    pub fn is_absolute(&self) -> bool {
        self.row_absolute || self.col_absolute
    }

    /// The same position with both absolute markers cleared
    pub fn relative(&self) -> Self {
        Self::new(self.row, self.col)
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "A1:B10")
///
/// The corners are normalized on construction, so `start` is always the top-left
/// and `end` the bottom-right cell regardless of the order they were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        let addr = addr.relative();
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation
    ///
    /// Text without a `:` is a single-cell range. Whitespace around either corner
    /// is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidRange(s.to_string());

        let mut parts = s.split(':');
        let start = parts.next().ok_or_else(invalid)?;
        let end = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let start = CellAddress::parse(start.trim()).map_err(|_| invalid())?;
        match end {
            Some(end) => {
                let end = CellAddress::parse(end.trim()).map_err(|_| invalid())?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(start)),
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            done: false,
        }
    }

    /// Expand the range into its cells in row-major order
    ///
    /// ```
    /// use gridbook_core::CellRange;
    ///
    /// let cells: Vec<String> = CellRange::parse("B2:A1")
    ///     .unwrap()
    ///     .expand()
    ///     .iter()
    ///     .map(|a| a.to_string())
    ///     .collect();
    /// assert_eq!(cells, ["A1", "B1", "A2", "B2"]);
    /// ```
    pub fn expand(&self) -> Vec<CellAddress> {
        self.cells().collect()
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u16,
    done: bool,
}

impl CellRangeIterator {
    fn remaining(&self) -> usize {
        if self.done {
            return 0;
        }
        let full_rows = (self.range.end.row - self.current_row) as usize;
        let in_row = (self.range.end.col - self.current_col) as usize + 1;
        full_rows * self.range.col_count() as usize + in_row
    }
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let addr = CellAddress::new(self.current_row, self.current_col);

        // Move to next cell
        if self.current_col < self.range.end.col {
            self.current_col += 1;
        } else if self.current_row < self.range.end.row {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.done = true;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}
