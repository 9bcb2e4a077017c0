//! Flat key-value snapshot of a whole workbook
//!
//! This is the shape exchanged with persistence layers:
//!
//! ```json
//! {
//!   "sheets": [{ "id": 1, "name": "Sheet1", "data": { "A1": "42", "B1": "=A1*2" } }],
//!   "activeSheetId": 1,
//!   "version": 1
//! }
//! ```
//!
//! Import is all-or-nothing: the snapshot is fully validated into a new
//! [`Workbook`] before the caller replaces anything.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cell::CellAddress;
use crate::error::{Error, Result};
use crate::sheet::{Sheet, SheetId};
use crate::workbook::Workbook;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One sheet in a [`WorkbookSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetSnapshot {
    pub id: SheetId,
    pub name: String,
    /// Raw content keyed by canonical address text
    pub data: BTreeMap<String, String>,
}

/// Full-state serialization record of a workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkbookSnapshot {
    pub sheets: Vec<SheetSnapshot>,
    pub active_sheet_id: SheetId,
    pub version: u32,
}

impl Workbook {
    /// Export the full state
    pub fn to_snapshot(&self) -> WorkbookSnapshot {
        let sheets = self
            .sheets()
            .map(|sheet| SheetSnapshot {
                id: sheet.id(),
                name: sheet.name().to_string(),
                data: sheet
                    .cells()
                    .map(|(addr, raw)| (addr.to_a1_string(), raw.to_string()))
                    .collect(),
            })
            .collect();

        WorkbookSnapshot {
            sheets,
            active_sheet_id: self.active_sheet_id(),
            version: SNAPSHOT_VERSION,
        }
    }

    /// Build a workbook from a snapshot
    ///
    /// Address keys are canonicalized (`$B$2` is stored as `B2`) and empty values are
    /// dropped. Any invalid key, two keys for one cell, duplicate id, unknown active id or newer version
    /// rejects the whole snapshot.
    pub fn from_snapshot(snapshot: &WorkbookSnapshot) -> Result<Self> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut sheets = Vec::with_capacity(snapshot.sheets.len());
        for entry in &snapshot.sheets {
            let mut sheet = Sheet::new(entry.id, entry.name.clone());
            let mut seen = BTreeSet::new();
            for (key, raw) in &entry.data {
                let addr = CellAddress::parse(key).map_err(|_| {
                    Error::InvalidSnapshot(format!(
                        "sheet {}: invalid cell address key '{}'",
                        entry.id, key
                    ))
                })?;
                if !seen.insert(addr.relative()) {
                    return Err(Error::InvalidSnapshot(format!(
                        "sheet {}: key '{}' names cell {} twice",
                        entry.id,
                        key,
                        addr.relative()
                    )));
                }
                sheet.commit(addr, raw.clone());
            }
            sheets.push(sheet);
        }

        Workbook::from_sheets(sheets, snapshot.active_sheet_id)
    }
}
