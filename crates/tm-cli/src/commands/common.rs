//! Shared helpers for CLI commands

use std::fmt;
use tm_core::{Config, Label, PlanRequest, Version};

/// Structured exit code carried through `anyhow::Error`.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Build a planner request from CLI arguments, OR-ing the force flags with
/// their configuration counterparts. Blank values count as absent.
pub(crate) fn plan_request(
    config: &Config,
    version: Option<&str>,
    label: Option<&str>,
    force_old_migrations: bool,
    force_files_on_down: bool,
) -> PlanRequest {
    PlanRequest {
        version: version.and_then(Version::try_new),
        label: label.and_then(Label::try_new),
        force_old_migrations: force_old_migrations || config.force_execute_old_migrations_versions,
        force_files_on_down: force_files_on_down || config.force_use_files_on_down,
    }
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Calculate column widths for a table given headers and row data.
///
/// For each column, returns the maximum width across the header and all
/// row values so that data aligns when printed with left-padding.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<width$}", cell.as_ref(), width = w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render a left-aligned table: header row, a dashed separator, then rows.
/// Columns are separated by two spaces and trailing padding is trimmed.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = calculate_column_widths(headers, rows);
    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut lines = vec![render_row(headers, &widths), render_row(&separator, &widths)];
    lines.extend(rows.iter().map(|row| render_row(row, &widths)));
    lines
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
