//! Example: build a small budget sheet, undo an edit and export JSON

use gridbook::prelude::*;

fn main() -> Result<()> {
    let mut session = Session::new();
    let sheet = session.active_sheet_id();

    // Header row
    session.commit_cell_edit(sheet, "A1", "Item");
    session.commit_cell_edit(sheet, "B1", "Cost");

    // Data rows
    session.commit_cell_edit(sheet, "A2", "rent");
    session.commit_cell_edit(sheet, "B2", "1200");
    session.commit_cell_edit(sheet, "A3", "food");
    session.commit_cell_edit(sheet, "B3", "450.5");
    session.commit_cell_edit(sheet, "A4", "rent");

    // Summary row
    session.commit_cell_edit(sheet, "A5", "=REMOVE_DUPLICATES(A2:A4)");
    session.commit_cell_edit(sheet, "B5", "=SUM(B2:B4)");
    session.commit_cell_edit(sheet, "C5", "=AVERAGE(B2:B4)");

    for (addr, value) in session.display_grid(sheet).unwrap_or_default() {
        println!("{}\t{}", addr, value);
    }

    // Undo the summary row and the duplicate entry
    session.undo();
    session.undo();
    session.undo();
    session.undo();
    println!("after undo, A4 = {:?}", session.raw_value(sheet, "A4"));

    println!("{}", session.to_json()?);
    Ok(())
}
