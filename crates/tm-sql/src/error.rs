//! Error types for tm-sql

use thiserror::Error;

/// SQL splitting and parsing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Trailing statement never closed its quotes or parentheses (S002)
    #[error("[S002] Unterminated SQL statement (unbalanced quotes or parentheses): {fragment}")]
    UnterminatedStatement { fragment: String },

    /// Unknown dialect name (S003)
    #[error("[S003] Unknown SQL dialect '{0}'. Valid dialects: generic, mysql, postgresql, mssql, oracle, clickhouse, duckdb")]
    UnknownDialect(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
