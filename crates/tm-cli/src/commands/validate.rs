//! Validate command implementation

use anyhow::Result;
use tm_core::{Dialect, Direction, Migration, MigrationCatalog};
use tm_sql::check_statements;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::ExitCode;
use crate::context::{load_config, scan_catalog};
use crate::output::OutputStyle;

/// Validation result severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single validation issue
#[derive(Debug)]
struct ValidationIssue {
    severity: Severity,
    code: &'static str,
    message: String,
    file: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.severity, self.code, self.message, self.file
        )
    }
}

/// Execute the validate command
pub(crate) async fn execute(
    _args: &ValidateArgs,
    global: &GlobalArgs,
    style: OutputStyle,
) -> Result<()> {
    let config = load_config(global)?;
    let catalog = scan_catalog(&config)?;
    let dialect = config.effective_dialect();

    println!(
        "Validating {} migration(s) ({} dialect)\n",
        catalog.len(),
        dialect
    );

    let issues = validate_catalog(&catalog, dialect);
    for issue in &issues {
        let line = issue.to_string();
        match issue.severity {
            Severity::Error => println!("{}", style.error(&line)),
            Severity::Warning => println!("{}", style.warning(&line)),
        }
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;
    if !issues.is_empty() {
        println!();
    }
    if errors > 0 {
        println!(
            "{} {} error(s), {} warning(s)",
            style.error("Validation failed:"),
            errors,
            warnings
        );
        return Err(ExitCode(1).into());
    }
    println!(
        "{} {} warning(s)",
        style.success("Validation passed."),
        warnings
    );
    Ok(())
}

/// Split both directions of every migration and syntax-check the result.
fn validate_catalog(catalog: &MigrationCatalog, dialect: Dialect) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for migration in catalog.migrations() {
        for direction in [Direction::Up, Direction::Down] {
            validate_body(migration, direction, dialect, &mut issues);
        }
    }
    issues
}

fn validate_body(
    migration: &Migration,
    direction: Direction,
    dialect: Dialect,
    issues: &mut Vec<ValidationIssue>,
) {
    let block = match direction {
        Direction::Up => "SQL_UP",
        Direction::Down => "SQL_DOWN",
    };
    let file = migration.to_string();

    let statements = match migration.statements(direction, dialect) {
        Ok(statements) => statements,
        Err(e) => {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "V001",
                message: format!("{block} cannot be split: {e}"),
                file,
            });
            return;
        }
    };

    if statements.is_empty() {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "V003",
            message: format!("{block} holds no statements"),
            file,
        });
        return;
    }

    for issue in check_statements(&statements, dialect) {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: "V002",
            message: format!(
                "{block} statement {}: {}",
                issue.index + 1,
                issue.error
            ),
            file: file.clone(),
        });
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
