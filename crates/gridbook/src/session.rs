//! Editing session over a workbook
//!
//! The [`Session`] is the single entry point a host talks to. It owns the
//! workbook, the undo/redo history and the options, and exposes edit intake,
//! display reads, sheet management and snapshot import/export.
//!
//! Edits and reads never fail: an invalid address or unknown sheet is logged and
//! ignored on write, and reads as `#INVALID!`.

use gridbook_core::{
    CellAddress, EditHistory, GridSnapshot, Sheet, SheetId, Workbook, WorkbookSnapshot,
};
use gridbook_formula::{display_value, ErrorToken};

use crate::error::Result;
use crate::options::SessionOptions;

/// One undo/redo step: the cells of one sheet before an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sheet: SheetId,
    pub cells: GridSnapshot,
}

/// A workbook together with its edit history
#[derive(Debug, Clone)]
pub struct Session {
    workbook: Workbook,
    history: EditHistory<HistoryEntry>,
    options: SessionOptions,
}

impl Session {
    /// Create a session with default options
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    /// Create a session with custom options
    pub fn with_options(options: SessionOptions) -> Self {
        let workbook = Workbook::with_sheets(options.initial_sheets.max(1));
        Self {
            workbook,
            history: new_history(&options),
            options,
        }
    }

    /// Create a session from an exported snapshot
    pub fn from_snapshot(snapshot: &WorkbookSnapshot, options: SessionOptions) -> Result<Self> {
        let workbook = Workbook::from_snapshot(snapshot)?;
        Ok(Self {
            workbook,
            history: new_history(&options),
            options,
        })
    }

    /// Create a session from snapshot JSON
    pub fn from_json(json: &str, options: SessionOptions) -> Result<Self> {
        let snapshot: WorkbookSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot, options)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Read-only access to the workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    // === Edit intake ===

    /// Commit raw content to a cell
    ///
    /// Records the sheet's previous state for undo, then writes. Content that is
    /// empty after trimming clears the cell. An invalid address or unknown sheet is
    /// ignored.
    pub fn commit_cell_edit(&mut self, sheet_id: SheetId, address: &str, raw: &str) {
        let addr = match CellAddress::parse(address) {
            Ok(addr) => addr,
            Err(e) => {
                log::warn!("ignoring edit on sheet {}: {}", sheet_id, e);
                return;
            }
        };

        let Some(sheet) = self.workbook.sheet_mut(sheet_id) else {
            log::warn!("ignoring edit of {}: sheet {} not found", addr, sheet_id);
            return;
        };

        self.history.record(HistoryEntry {
            sheet: sheet_id,
            cells: sheet.snapshot(),
        });
        sheet.commit(addr, raw);
    }

    /// Commit raw content to a cell of the active sheet
    pub fn commit_active_cell_edit(&mut self, address: &str, raw: &str) {
        self.commit_cell_edit(self.workbook.active_sheet_id(), address, raw);
    }

    // === Display reads ===

    /// Display value of a cell
    ///
    /// Plain content is returned as it was committed, formulas are evaluated, and
    /// empty cells read as the empty string. Failures come back as error tokens.
    pub fn get_display_value(&self, sheet_id: SheetId, address: &str) -> String {
        let (Some(sheet), Ok(addr)) = (self.workbook.sheet(sheet_id), CellAddress::parse(address))
        else {
            return ErrorToken::Invalid.to_string();
        };
        display_value(sheet, &addr, &self.options.evaluation)
    }

    /// Raw content of a cell, if any
    pub fn raw_value(&self, sheet_id: SheetId, address: &str) -> Option<&str> {
        let addr = CellAddress::parse(address).ok()?;
        self.workbook.sheet(sheet_id)?.read(&addr)
    }

    /// Display values of every non-empty cell of a sheet, row-major
    pub fn display_grid(&self, sheet_id: SheetId) -> Option<Vec<(CellAddress, String)>> {
        let sheet = self.workbook.sheet(sheet_id)?;
        Some(
            sheet
                .cells()
                .map(|(addr, _)| (*addr, display_value(sheet, addr, &self.options.evaluation)))
                .collect(),
        )
    }

    // === Undo / redo ===

    /// Undo the most recent edit
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(sheet_id) = self.history.peek_undo().map(|entry| entry.sheet) else {
            return false;
        };
        let Some(sheet) = self.workbook.sheet_mut(sheet_id) else {
            return false;
        };

        let current = HistoryEntry {
            sheet: sheet_id,
            cells: sheet.snapshot(),
        };
        match self.history.undo(current) {
            Some(previous) => {
                log::debug!("undo on sheet {}", sheet_id);
                sheet.restore(previous.cells);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone edit
    ///
    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(sheet_id) = self.history.peek_redo().map(|entry| entry.sheet) else {
            return false;
        };
        let Some(sheet) = self.workbook.sheet_mut(sheet_id) else {
            return false;
        };

        let current = HistoryEntry {
            sheet: sheet_id,
            cells: sheet.snapshot(),
        };
        match self.history.redo(current) {
            Some(next) => {
                log::debug!("redo on sheet {}", sheet_id);
                sheet.restore(next.cells);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // === Sheet management ===

    /// Sheets in display order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.workbook.sheets()
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.workbook.sheet(id)
    }

    pub fn active_sheet_id(&self) -> SheetId {
        self.workbook.active_sheet_id()
    }

    /// Switch the active sheet; false if the id is unknown
    pub fn set_active_sheet(&mut self, id: SheetId) -> bool {
        self.workbook.set_active_sheet(id).is_ok()
    }

    /// Append a sheet (default name `Sheet<N+1>`)
    pub fn add_sheet(&mut self, name: Option<&str>) -> SheetId {
        self.workbook.add_sheet(name)
    }

    /// Delete a sheet
    ///
    /// Refused for the last remaining sheet or an unknown id. History entries that
    /// belong to the deleted sheet are dropped.
    pub fn delete_sheet(&mut self, id: SheetId) -> bool {
        if !self.workbook.delete_sheet(id) {
            return false;
        }
        self.history.retain(|entry| entry.sheet != id);
        true
    }

    /// Rename a sheet; false if the id is unknown
    pub fn rename_sheet(&mut self, id: SheetId, name: &str) -> bool {
        self.workbook.rename_sheet(id, name)
    }

    // === Snapshots ===

    /// Export the full workbook state
    pub fn export_snapshot(&self) -> WorkbookSnapshot {
        self.workbook.to_snapshot()
    }

    /// Export the full workbook state as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_snapshot())?)
    }

    /// Replace the workbook with a snapshot
    ///
    /// The snapshot is validated completely first; on error nothing changes. A
    /// successful import clears the undo/redo history.
    pub fn import_snapshot(&mut self, snapshot: &WorkbookSnapshot) -> Result<()> {
        let workbook = Workbook::from_snapshot(snapshot).map_err(|e| {
            log::warn!("rejected snapshot import: {}", e);
            e
        })?;
        self.workbook = workbook;
        self.history.clear();
        Ok(())
    }

    /// Replace the workbook with snapshot JSON
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let snapshot: WorkbookSnapshot = serde_json::from_str(json).map_err(|e| {
            log::warn!("rejected snapshot import: {}", e);
            e
        })?;
        self.import_snapshot(&snapshot)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn new_history(options: &SessionOptions) -> EditHistory<HistoryEntry> {
    match options.max_undo_depth {
        Some(depth) => EditHistory::with_max_depth(depth),
        None => EditHistory::new(),
    }
}
