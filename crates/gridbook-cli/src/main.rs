//! Gridbook CLI - inspect and edit workbook snapshots

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gridbook::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridbook")]
#[command(author, version, about = "Inspect and edit gridbook workbook snapshots")]
struct Cli {
    /// Session options as JSON (initialSheets, maxUndoDepth, evaluation)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every non-empty cell with its display value
    Show {
        /// Snapshot file
        input: PathBuf,

        /// Sheet id (default: the active sheet)
        #[arg(short, long)]
        sheet: Option<u32>,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Snapshot file
        input: PathBuf,
    },

    /// Print the display value of one cell
    Eval {
        /// Snapshot file
        input: PathBuf,

        /// Cell address (e.g. B3)
        address: String,

        /// Sheet id (default: the active sheet)
        #[arg(short, long)]
        sheet: Option<u32>,
    },

    /// Commit raw content to a cell and save the snapshot
    Set {
        /// Snapshot file
        input: PathBuf,

        /// Cell address (e.g. B3)
        address: String,

        /// Raw content; blank clears the cell
        raw: String,

        /// Sheet id (default: the active sheet)
        #[arg(short, long)]
        sheet: Option<u32>,

        /// Output snapshot file (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an empty workbook snapshot
    New {
        /// Output snapshot file
        output: PathBuf,
    },

    /// Export a sheet's display values as CSV to stdout or file
    Csv {
        /// Snapshot file
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sheet id (default: the active sheet)
        #[arg(short, long)]
        sheet: Option<u32>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Show { input, sheet } => show(&input, sheet, options),
        Commands::Sheets { input } => list_sheets(&input, options),
        Commands::Eval {
            input,
            address,
            sheet,
        } => eval(&input, &address, sheet, options),
        Commands::Set {
            input,
            address,
            raw,
            sheet,
            output,
        } => set(&input, &address, &raw, sheet, output.as_deref(), options),
        Commands::New { output } => new_workbook(&output, options),
        Commands::Csv {
            input,
            output,
            sheet,
            delimiter,
        } => to_csv(&input, output.as_deref(), sheet, delimiter, options),
    }
}

fn load_options(path: Option<&Path>) -> Result<SessionOptions> {
    let Some(path) = path else {
        return Ok(SessionOptions::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    SessionOptions::from_json(&json)
        .with_context(|| format!("Invalid options in '{}'", path.display()))
}

fn open(input: &Path, options: SessionOptions) -> Result<Session> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    Session::from_json(&json, options)
        .with_context(|| format!("Invalid snapshot '{}'", input.display()))
}

fn save(session: &Session, output: &Path) -> Result<()> {
    let json = session.to_json().context("Failed to serialize snapshot")?;
    std::fs::write(output, json + "\n")
        .with_context(|| format!("Failed to write '{}'", output.display()))
}

/// Resolve `--sheet`, defaulting to the active sheet
fn select_sheet(session: &Session, sheet: Option<u32>) -> Result<SheetId> {
    match sheet.map(SheetId) {
        Some(id) if session.sheet(id).is_none() => bail!("Sheet {} not found", id),
        Some(id) => Ok(id),
        None => Ok(session.active_sheet_id()),
    }
}

fn show(input: &Path, sheet: Option<u32>, options: SessionOptions) -> Result<()> {
    let session = open(input, options)?;
    let sheet_id = select_sheet(&session, sheet)?;

    let grid = session.display_grid(sheet_id).unwrap_or_default();
    if grid.is_empty() {
        eprintln!("Sheet {} is empty", sheet_id);
    }
    for (addr, value) in grid {
        println!("{}\t{}", addr, value);
    }

    Ok(())
}

fn list_sheets(input: &Path, options: SessionOptions) -> Result<()> {
    let session = open(input, options)?;
    let active = session.active_sheet_id();

    for sheet in session.sheets() {
        let marker = if sheet.id() == active { "\t*" } else { "" };
        println!("{}\t{}\t{}{}", sheet.id(), sheet.name(), sheet.len(), marker);
    }

    Ok(())
}

fn eval(input: &Path, address: &str, sheet: Option<u32>, options: SessionOptions) -> Result<()> {
    let session = open(input, options)?;
    let sheet_id = select_sheet(&session, sheet)?;

    println!("{}", session.get_display_value(sheet_id, address));
    Ok(())
}

fn set(
    input: &Path,
    address: &str,
    raw: &str,
    sheet: Option<u32>,
    output: Option<&Path>,
    options: SessionOptions,
) -> Result<()> {
    let mut session = open(input, options)?;
    let sheet_id = select_sheet(&session, sheet)?;

    // The session ignores bad addresses; the CLI reports them
    CellAddress::parse(address).with_context(|| format!("Invalid address '{}'", address))?;

    session.commit_cell_edit(sheet_id, address, raw);
    save(&session, output.unwrap_or(input))?;

    eprintln!(
        "{}!{} = {}",
        sheet_id,
        address,
        session.get_display_value(sheet_id, address)
    );
    Ok(())
}

fn new_workbook(output: &Path, options: SessionOptions) -> Result<()> {
    let session = Session::with_options(options);
    save(&session, output)?;
    eprintln!(
        "Wrote {} empty sheet(s) to '{}'",
        session.workbook().sheet_count(),
        output.display()
    );
    Ok(())
}

fn to_csv(
    input: &Path,
    output: Option<&Path>,
    sheet: Option<u32>,
    delimiter: char,
    options: SessionOptions,
) -> Result<()> {
    let session = open(input, options)?;
    let sheet_id = select_sheet(&session, sheet)?;

    // Get the used range
    let used_range = match session.sheet(sheet_id).and_then(|s| s.used_range()) {
        Some(range) => range,
        None => {
            eprintln!("Warning: Sheet appears to be empty");
            return Ok(());
        }
    };

    let max_row = used_range.end.row;
    let max_col = used_range.end.col;

    // Build CSV output from the top-left corner so row and column positions survive
    let mut csv_output = String::new();

    for row in 0..=max_row {
        let mut first = true;
        for col in 0..=max_col {
            if !first {
                csv_output.push(delimiter);
            }
            first = false;

            let addr = CellAddress::new(row, col).to_a1_string();
            let value = session.get_display_value(sheet_id, &addr);
            csv_output.push_str(&csv_field(&value, delimiter));
        }
        csv_output.push('\n');
    }

    // Output
    if let Some(output_path) = output {
        std::fs::write(output_path, &csv_output)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote {} rows to '{}'", max_row + 1, output_path.display());
    } else {
        io::stdout()
            .write_all(csv_output.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Quote a display value for CSV if necessary
fn csv_field(text: &str, delimiter: char) -> String {
    if text.contains(delimiter) || text.contains('"') || text.contains('\n') || text.contains('\r')
    {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
