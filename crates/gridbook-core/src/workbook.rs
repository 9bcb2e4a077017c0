//! Workbook type - the ordered sheet collection

use crate::error::{Error, Result};
use crate::sheet::{Sheet, SheetId};

/// A workbook (spreadsheet document)
///
/// Owns an ordered list of sheets and the id of the active one. There is always at
/// least one sheet: structural operations that would break this are refused as
/// no-ops rather than reported as errors.
#[derive(Debug, Clone)]
pub struct Workbook {
    /// Sheets in display order
    sheets: Vec<Sheet>,
    /// Active sheet id
    active_sheet: SheetId,
    /// Next id handed out by `add_sheet`
    next_id: u32,
}

impl Workbook {
    /// Create a new workbook with one sheet named `Sheet1`
    pub fn new() -> Self {
        Self::with_sheets(1)
    }

    /// Create a workbook with `count` default-named sheets (at least one)
    pub fn with_sheets(count: usize) -> Self {
        let first = Sheet::new(SheetId(1), "Sheet1");
        let mut wb = Self {
            active_sheet: first.id(),
            sheets: vec![first],
            next_id: 2,
        };
        for _ in 1..count {
            wb.add_sheet(None);
        }
        wb
    }

    /// Rebuild a workbook from parts
    ///
    /// Fails if there are no sheets, ids repeat, `active` is not one of them, or the
    /// largest id is `u32::MAX`.
    pub fn from_sheets(sheets: Vec<Sheet>, active: SheetId) -> Result<Self> {
        if sheets.is_empty() {
            return Err(Error::InvalidSnapshot("workbook has no sheets".into()));
        }
        for (i, sheet) in sheets.iter().enumerate() {
            if sheets[..i].iter().any(|s| s.id() == sheet.id()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate sheet id {}",
                    sheet.id()
                )));
            }
        }
        if !sheets.iter().any(|s| s.id() == active) {
            return Err(Error::InvalidSnapshot(format!(
                "active sheet {} is not in the workbook",
                active
            )));
        }

        let max_id = sheets.iter().map(|s| s.id().0).max().unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or_else(|| {
            Error::InvalidSnapshot(format!("sheet id {} leaves no id for new sheets", max_id))
        })?;
        Ok(Self {
            sheets,
            active_sheet: active,
            next_id,
        })
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get a sheet by id
    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id() == id)
    }

    /// Get a mutable sheet by id
    pub fn sheet_mut(&mut self, id: SheetId) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id() == id)
    }

    /// Get the position of a sheet in display order
    pub fn sheet_index(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id() == id)
    }

    /// Get the first sheet with this name
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Iterate over all sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Add a new empty sheet at the end
    ///
    /// Without a name the sheet is called `Sheet<N+1>`, where N is the current count.
    pub fn add_sheet(&mut self, name: Option<&str>) -> SheetId {
        let id = self.allocate_id();

        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Sheet{}", self.sheets.len() + 1),
        };
        log::debug!("adding sheet {} ({:?})", id, name);
        self.sheets.push(Sheet::new(id, name));
        id
    }

    /// Hand out an id no current sheet holds
    ///
    /// Ids count up from the largest one seen. Once the counter reaches `u32::MAX`
    /// and that id is taken, the lowest id not held by a current sheet is used.
    fn allocate_id(&mut self) -> SheetId {
        if let Some(next) = self.next_id.checked_add(1) {
            let id = SheetId(self.next_id);
            self.next_id = next;
            return id;
        }
        if self.sheet(SheetId(self.next_id)).is_none() {
            return SheetId(self.next_id);
        }
        let free = (1..u32::MAX)
            .find(|&candidate| self.sheet(SheetId(candidate)).is_none())
            .unwrap_or(0);
        log::debug!("sheet id counter exhausted, reusing free id {}", free);
        SheetId(free)
    }

    /// Remove a sheet
    ///
    /// Returns `false` without changing anything when `id` is unknown or names the only
    /// remaining sheet. Removing the active sheet activates the first remaining one.
    pub fn delete_sheet(&mut self, id: SheetId) -> bool {
        if self.sheets.len() <= 1 {
            log::warn!("refusing to delete sheet {}: it is the last sheet", id);
            return false;
        }
        let Some(index) = self.sheet_index(id) else {
            log::warn!("refusing to delete sheet {}: no such sheet", id);
            return false;
        };

        self.sheets.remove(index);
        if self.active_sheet == id {
            self.active_sheet = self.sheets[0].id();
        }
        log::debug!("deleted sheet {}, active is {}", id, self.active_sheet);
        true
    }

    /// Rename a sheet
    ///
    /// Names are not deduplicated. Returns `false` if `id` is unknown.
    pub fn rename_sheet(&mut self, id: SheetId, new_name: &str) -> bool {
        match self.sheet_mut(id) {
            Some(sheet) => {
                log::debug!("renaming sheet {} to {:?}", id, new_name);
                sheet.set_name(new_name);
                true
            }
            None => false,
        }
    }

    /// Get the active sheet id
    pub fn active_sheet_id(&self) -> SheetId {
        self.active_sheet
    }

    /// Set the active sheet
    pub fn set_active_sheet(&mut self, id: SheetId) -> Result<()> {
        if self.sheet_index(id).is_none() {
            return Err(Error::SheetNotFound(id));
        }
        self.active_sheet = id;
        Ok(())
    }

    /// Get the active sheet
    pub fn active_sheet(&self) -> &Sheet {
        let index = self.sheet_index(self.active_sheet).unwrap_or(0);
        &self.sheets[index]
    }

    /// Get the active sheet mutably
    pub fn active_sheet_mut(&mut self) -> &mut Sheet {
        let index = self.sheet_index(self.active_sheet).unwrap_or(0);
        &mut self.sheets[index]
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(wb: &Workbook) -> Vec<&str> {
        wb.sheets().map(|s| s.name()).collect()
    }

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.active_sheet().name(), "Sheet1");
        assert_eq!(wb.active_sheet_id(), SheetId(1));
    }

    #[test]
    fn test_with_sheets() {
        let wb = Workbook::with_sheets(3);
        assert_eq!(names(&wb), vec!["Sheet1", "Sheet2", "Sheet3"]);

        let wb = Workbook::with_sheets(0);
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_add_sheet_default_name() {
        let mut wb = Workbook::new();
        let id = wb.add_sheet(None);
        assert_eq!(wb.sheet(id).unwrap().name(), "Sheet2");

        let id = wb.add_sheet(Some("Budget"));
        assert_eq!(wb.sheet(id).unwrap().name(), "Budget");
        assert!(wb.sheet(id).unwrap().is_empty());

        // Default name follows the count, so it can collide after a delete
        wb.delete_sheet(SheetId(2));
        let id = wb.add_sheet(None);
        assert_eq!(wb.sheet(id).unwrap().name(), "Sheet3");
        assert_eq!(names(&wb), vec!["Sheet1", "Budget", "Sheet3"]);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut wb = Workbook::new();
        let a = wb.add_sheet(None);
        assert!(wb.delete_sheet(a));
        let b = wb.add_sheet(None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_delete_last_sheet_rejected() {
        let mut wb = Workbook::new();
        let id = wb.active_sheet_id();
        assert!(!wb.delete_sheet(id));
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_delete_unknown_sheet_rejected() {
        let mut wb = Workbook::with_sheets(2);
        assert!(!wb.delete_sheet(SheetId(99)));
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_delete_active_sheet_activates_first() {
        let mut wb = Workbook::with_sheets(3);
        let third = wb.sheets().nth(2).unwrap().id();
        wb.set_active_sheet(third).unwrap();

        assert!(wb.delete_sheet(third));
        assert_eq!(wb.active_sheet_id(), SheetId(1));

        // Deleting the first sheet while it is active moves to the new first
        assert!(wb.delete_sheet(SheetId(1)));
        assert_eq!(wb.active_sheet_id(), SheetId(2));
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_delete_inactive_sheet_keeps_active() {
        let mut wb = Workbook::with_sheets(3);
        wb.set_active_sheet(SheetId(3)).unwrap();
        assert!(wb.delete_sheet(SheetId(1)));
        assert_eq!(wb.active_sheet_id(), SheetId(3));
    }

    #[test]
    fn test_rename_sheet() {
        let mut wb = Workbook::with_sheets(2);
        wb.set_active_sheet(SheetId(2)).unwrap();
        assert!(wb.rename_sheet(SheetId(2), "Sheet1"));

        // Duplicate names are allowed and do not affect ids or the active pointer
        assert_eq!(names(&wb), vec!["Sheet1", "Sheet1"]);
        assert_eq!(wb.active_sheet_id(), SheetId(2));
        assert!(!wb.rename_sheet(SheetId(7), "x"));
    }

    #[test]
    fn test_set_active_sheet_unknown() {
        let mut wb = Workbook::new();
        assert_eq!(
            wb.set_active_sheet(SheetId(5)),
            Err(Error::SheetNotFound(SheetId(5)))
        );
    }

    #[test]
    fn test_sheets_are_isolated() {
        let mut wb = Workbook::with_sheets(2);
        wb.sheet_mut(SheetId(1)).unwrap().commit_at("A1", "one").unwrap();
        wb.sheet_mut(SheetId(2)).unwrap().commit_at("A1", "two").unwrap();

        assert_eq!(wb.sheet(SheetId(1)).unwrap().read_at("A1").unwrap(), Some("one"));
        assert_eq!(wb.sheet(SheetId(2)).unwrap().read_at("A1").unwrap(), Some("two"));
    }

    #[test]
    fn test_from_sheets_validation() {
        let sheets = vec![Sheet::new(SheetId(4), "a"), Sheet::new(SheetId(9), "b")];
        let mut wb = Workbook::from_sheets(sheets, SheetId(9)).unwrap();
        assert_eq!(wb.active_sheet().name(), "b");
        assert_eq!(wb.add_sheet(None), SheetId(10));

        assert!(Workbook::from_sheets(vec![], SheetId(1)).is_err());
        assert!(Workbook::from_sheets(
            vec![Sheet::new(SheetId(1), "a"), Sheet::new(SheetId(1), "b")],
            SheetId(1)
        )
        .is_err());
        assert!(Workbook::from_sheets(vec![Sheet::new(SheetId(1), "a")], SheetId(2)).is_err());
    }

    #[test]
    fn test_from_sheets_rejects_exhausted_ids() {
        let sheets = vec![Sheet::new(SheetId(u32::MAX), "S")];
        assert!(matches!(
            Workbook::from_sheets(sheets, SheetId(u32::MAX)),
            Err(Error::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_add_sheet_after_counter_exhausted() {
        let sheets = vec![Sheet::new(SheetId(1), "a"), Sheet::new(SheetId(u32::MAX - 1), "b")];
        let mut wb = Workbook::from_sheets(sheets, SheetId(1)).unwrap();

        assert_eq!(wb.add_sheet(None), SheetId(u32::MAX));
        assert_eq!(wb.add_sheet(None), SheetId(2));
        assert_eq!(wb.add_sheet(None), SheetId(3));

        let mut ids: Vec<u32> = wb.sheets().map(|s| s.id().0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), wb.sheet_count());
    }
}
