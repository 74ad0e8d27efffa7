use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;

use crate::cli::{report, ReportKind};
use crate::date::today;
use crate::error::Result;
use crate::loader::{load_file, LoadReport};
use crate::settings::shellexpand_path;
use crate::store::AccountStore;

pub fn write_summary<W: Write>(out: &mut W, result: &LoadReport) -> std::io::Result<()> {
    for key in &result.duplicates {
        writeln!(out, "{}", format!("{key} is already in the database.").red())?;
    }
    for failure in &result.failures {
        writeln!(out, "{}", format!("line {}: {}", failure.line, failure.error).red())?;
    }
    writeln!(
        out,
        "{} opened, {} duplicates, {} skipped",
        result.opened.len(),
        result.duplicates.len(),
        result.failures.len()
    )
}

pub fn run(file: &str, kind: ReportKind, as_table: bool) -> Result<()> {
    let path = PathBuf::from(shellexpand_path(file));
    let mut store = AccountStore::new();
    let result = load_file(&path, &mut store, today())?;

    let mut stdout = std::io::stdout().lock();
    write_summary(&mut stdout, &result)?;

    if as_table && !store.is_empty() {
        writeln!(stdout, "{}", report::table(kind, &mut store))?;
    } else {
        for line in report::lines(kind, &mut store) {
            writeln!(stdout, "{line}")?;
        }
    }
    Ok(())
}
