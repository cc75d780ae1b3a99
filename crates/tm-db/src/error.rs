//! Error types for tm-db

use thiserror::Error;

/// Schema store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// A migration statement failed (D003)
    #[error("[D003] Error executing migration statement: {message}\n  statement: {statement}")]
    StatementFailed { statement: String, message: String },

    /// BEGIN / COMMIT / ROLLBACK failed (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// History row that cannot be turned back into a migration (D006)
    #[error("[D006] Invalid row in version table: {0}")]
    CorruptHistory(String),

    /// Version table name that cannot be used as an identifier (D007)
    #[error("[D007] Invalid version table name '{0}'")]
    InvalidTableName(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<tokio_postgres::Error> for DbError {
    fn from(err: tokio_postgres::Error) -> Self {
        DbError::ExecutionError(pg_message(&err))
    }
}

/// `to_string` on a server error only says "db error"; the server's own
/// message lives in the `DbError` payload.
pub(crate) fn pg_message(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    }
}
