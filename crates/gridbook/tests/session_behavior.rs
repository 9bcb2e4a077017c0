//! End-to-end tests of a session: edits, formulas, sheets and snapshots

use gridbook::prelude::*;
use gridbook::HistoryEntry;
use pretty_assertions::assert_eq;

fn session_with(cells: &[(&str, &str)]) -> (Session, SheetId) {
    let mut session = Session::new();
    let sheet = session.active_sheet_id();
    for (addr, raw) in cells {
        session.commit_cell_edit(sheet, addr, raw);
    }
    (session, sheet)
}

/// Aggregates over a range that mixes numbers, text and blanks
#[test]
fn test_aggregates_mixed_range() {
    let (session, sheet) = session_with(&[
        ("A1", "1"),
        ("A2", "x"),
        ("A3", "3"),
        ("B1", "=SUM(A1:A3)"),
        ("B2", "=COUNT(A1:A4)"),
        ("B3", "=MAX(A1:A3)"),
        ("B4", "=MIN(A3:A1)"),
        ("B5", "=AVERAGE(A1:A3)"),
    ]);

    assert_eq!(session.get_display_value(sheet, "B1"), "4");
    assert_eq!(session.get_display_value(sheet, "B2"), "2");
    assert_eq!(session.get_display_value(sheet, "B3"), "3");
    assert_eq!(session.get_display_value(sheet, "B4"), "1");
    assert_eq!(session.get_display_value(sheet, "B5"), "2.00");
}

/// Aggregates over an empty range
#[test]
fn test_aggregates_empty_range() {
    let (session, sheet) = session_with(&[
        ("B1", "=SUM(A1:A3)"),
        ("B2", "=AVERAGE(A1:A3)"),
        ("B3", "=MAX(A1:A3)"),
        ("B4", "=MIN(A1:A3)"),
    ]);

    assert_eq!(session.get_display_value(sheet, "B1"), "0");
    assert_eq!(session.get_display_value(sheet, "B2"), "#DIV/0!");
    assert_eq!(session.get_display_value(sheet, "B3"), "#ERROR!");
    assert_eq!(session.get_display_value(sheet, "B4"), "#ERROR!");
}

/// AVERAGE always shows two decimals
#[test]
fn test_average_rendering() {
    let (session, sheet) = session_with(&[("A1", "2"), ("A2", "4"), ("B1", "=AVERAGE(A1:A2)")]);
    assert_eq!(session.get_display_value(sheet, "B1"), "3.00");
}

/// Text functions on single cells and ranges
#[test]
fn test_text_functions() {
    let (session, sheet) = session_with(&[
        ("A1", "  Hello World  "),
        ("A2", "apple"),
        ("A3", "pear"),
        ("A4", "apple"),
        ("B1", "=TRIM(A1)"),
        ("B2", "=UPPER(A1)"),
        ("B3", "=LOWER($A$1)"),
        ("B4", "=REMOVE_DUPLICATES(A2:A4)"),
        ("B5", "=FIND_AND_REPLACE(A2:A4, p+, P)"),
        ("B6", "=FIND_AND_REPLACE(A2:A4, [, x)"),
    ]);

    assert_eq!(session.get_display_value(sheet, "B1"), "Hello World");
    assert_eq!(session.get_display_value(sheet, "B2"), "  HELLO WORLD  ");
    assert_eq!(session.get_display_value(sheet, "B3"), "  hello world  ");
    assert_eq!(session.get_display_value(sheet, "B4"), "apple, pear");
    assert_eq!(session.get_display_value(sheet, "B5"), "aPle, Pear, aPle");
    assert_eq!(session.get_display_value(sheet, "B6"), "#ERROR!");
}

/// Formula failures show error tokens instead of failing
#[test]
fn test_error_tokens() {
    let (session, sheet) = session_with(&[
        ("A1", "=UNKNOWNFN(A1)"),
        ("A2", "=SUM(A1:B2:C3)"),
        ("A3", "=A1+"),
        ("A4", "=B9*2"),
        ("A5", "=10/0"),
    ]);

    for addr in ["A1", "A2", "A3", "A4", "A5"] {
        assert_eq!(session.get_display_value(sheet, addr), "#ERROR!", "{}", addr);
    }
    assert_eq!(session.get_display_value(sheet, "$Z$0"), "#INVALID!");
    assert_eq!(session.get_display_value(sheet, "AB1"), "#INVALID!");
}

/// Plain content keeps its exact text, formulas keep their raw text
#[test]
fn test_raw_content_preserved() {
    let (session, sheet) = session_with(&[("A1", "  padded  "), ("A2", "=1+1")]);

    assert_eq!(session.get_display_value(sheet, "A1"), "  padded  ");
    assert_eq!(session.raw_value(sheet, "A1"), Some("  padded  "));
    assert_eq!(session.get_display_value(sheet, "A2"), "2");
    assert_eq!(session.raw_value(sheet, "A2"), Some("=1+1"));
}

/// Committing blank content removes the record
#[test]
fn test_blank_commit_clears() {
    let (mut session, sheet) = session_with(&[("A1", "value")]);
    session.commit_cell_edit(sheet, "A1", "   ");

    assert_eq!(session.raw_value(sheet, "A1"), None);
    assert!(session.sheet(sheet).unwrap().is_empty());
}

/// N commits then N undos restore the starting grid; redo replays them
#[test]
fn test_undo_redo_sequence() {
    let (mut session, sheet) = session_with(&[("A1", "base")]);
    let start = session.export_snapshot();

    session.commit_cell_edit(sheet, "A1", "changed");
    session.commit_cell_edit(sheet, "B2", "=A1");
    session.commit_cell_edit(sheet, "A1", "");
    let end = session.export_snapshot();

    for _ in 0..3 {
        assert!(session.undo());
    }
    assert_eq!(session.export_snapshot(), start);

    for _ in 0..3 {
        assert!(session.redo());
    }
    assert_eq!(session.export_snapshot(), end);
    assert!(!session.can_redo());
}

/// A new edit after undo discards the redo branch
#[test]
fn test_commit_after_undo_discards_redo() {
    let (mut session, sheet) = session_with(&[("A1", "1"), ("A1", "2")]);

    assert!(session.undo());
    assert!(session.can_redo());

    session.commit_cell_edit(sheet, "A1", "3");
    assert!(!session.can_redo());
    assert!(!session.redo());
    assert_eq!(session.raw_value(sheet, "A1"), Some("3"));
}

/// Undo with an empty history does nothing
#[test]
fn test_undo_empty_history() {
    let mut session = Session::new();
    assert!(!session.undo());
    assert!(!session.redo());
}

/// Sheet management follows the collection rules
#[test]
fn test_sheet_management() {
    let mut session = Session::new();
    let first = session.active_sheet_id();

    // The sole sheet cannot be deleted
    assert!(!session.delete_sheet(first));

    let second = session.add_sheet(None);
    let third = session.add_sheet(Some("Data"));
    let names: Vec<_> = session.sheets().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["Sheet1", "Sheet2", "Data"]);

    assert!(session.set_active_sheet(third));
    assert!(session.delete_sheet(third));
    assert_eq!(session.active_sheet_id(), first);

    assert!(session.rename_sheet(second, "Summary"));
    assert_eq!(session.sheet(second).unwrap().name(), "Summary");
    assert!(!session.rename_sheet(third, "Gone"));
    assert!(!session.set_active_sheet(third));

    // Deleting the active first sheet activates the new first sheet
    assert!(session.delete_sheet(first));
    assert_eq!(session.active_sheet_id(), second);
}

/// Formulas resolve against their own sheet
#[test]
fn test_sheets_are_independent() {
    let mut session = Session::new();
    let first = session.active_sheet_id();
    let second = session.add_sheet(None);

    session.commit_cell_edit(first, "A1", "10");
    session.commit_cell_edit(second, "A1", "20");
    session.commit_cell_edit(second, "A2", "=A1*2");

    assert_eq!(session.get_display_value(second, "A2"), "40");
    assert_eq!(session.get_display_value(first, "A2"), "");
}

/// JSON export and import keep the raw content, names, ids and active sheet
#[test]
fn test_json_snapshot_exchange() {
    let mut session = Session::new();
    let first = session.active_sheet_id();
    let second = session.add_sheet(Some("Other"));
    session.commit_cell_edit(first, "A1", "3");
    session.commit_cell_edit(first, "A2", "=A1*A1");
    session.commit_cell_edit(second, "C3", "note");
    session.set_active_sheet(second);

    let json = session.to_json().unwrap();
    let restored = Session::from_json(&json, SessionOptions::default()).unwrap();

    assert_eq!(restored.export_snapshot(), session.export_snapshot());
    assert_eq!(restored.active_sheet_id(), second);
    assert_eq!(restored.get_display_value(first, "A2"), "9");
    assert!(!restored.can_undo());
}

/// Import rejects malformed snapshots as a whole
#[test]
fn test_import_validation() {
    let mut session = Session::new();
    let before = session.export_snapshot();

    let cases = [
        r#"{ "sheets": [], "activeSheetId": 1, "version": 1 }"#,
        r#"{ "sheets": [{ "id": 1, "name": "A", "data": {} }, { "id": 1, "name": "B", "data": {} }], "activeSheetId": 1, "version": 1 }"#,
        r#"{ "sheets": [{ "id": 1, "name": "A", "data": { "A1": "ok", "B0": "bad" } }], "activeSheetId": 1, "version": 1 }"#,
        r#"{ "sheets": [{ "id": 1, "name": "A", "data": {} }], "activeSheetId": 2, "version": 1 }"#,
        r#"{ "sheets": [{ "id": 1, "name": "A", "data": {} }], "activeSheetId": 1, "version": 99 }"#,
    ];
    for json in cases {
        assert!(session.import_json(json).is_err(), "{}", json);
        assert_eq!(session.export_snapshot(), before);
    }
}

/// Undo entries are tagged with the sheet they belong to
#[test]
fn test_history_entry_shape() {
    let entry = HistoryEntry {
        sheet: SheetId(1),
        cells: Default::default(),
    };
    assert!(entry.cells.is_empty());
}
