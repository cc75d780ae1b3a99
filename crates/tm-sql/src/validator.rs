//! Statement syntax checks backed by sqlparser

use crate::dialect::Dialect;
use crate::error::SqlError;
use regex::Regex;
use std::sync::OnceLock;

/// A statement that failed the syntax check
#[derive(Debug)]
pub struct StatementIssue {
    /// Zero-based position of the statement in its migration body
    pub index: usize,

    /// The offending statement
    pub statement: String,

    /// Parser error
    pub error: SqlError,
}

fn procedural_object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)\A\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:TRIGGER|FUNCTION|PROCEDURE|PACKAGE)\b")
            .expect("valid regex literal")
    })
}

/// Returns `true` for trigger, function, procedure and package definitions.
///
/// Their bodies are vendor procedural languages that sqlparser does not
/// cover, so they are never syntax-checked.
pub fn is_procedural_object(statement: &str) -> bool {
    procedural_object_pattern().is_match(statement)
}

/// Syntax-check already split statements against `dialect`.
///
/// Returns one issue per statement sqlparser rejects; an empty vector means
/// every checkable statement parsed.
pub fn check_statements(statements: &[String], dialect: Dialect) -> Vec<StatementIssue> {
    statements
        .iter()
        .enumerate()
        .filter(|(_, statement)| !is_procedural_object(statement))
        .filter_map(|(index, statement)| match dialect.parse(statement) {
            Ok(_) => None,
            Err(error) => {
                log::debug!("Statement {} failed to parse: {}", index, error);
                Some(StatementIssue {
                    index,
                    statement: statement.clone(),
                    error,
                })
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
