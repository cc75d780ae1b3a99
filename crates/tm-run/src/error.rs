//! Error types for tm-run

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;
use tm_sql::SqlError;

/// Runner errors
#[derive(Error, Debug)]
pub enum RunError {
    /// R001: Configuration, catalog or planning error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// R002: Store error outside a migration step
    #[error(transparent)]
    Db(#[from] DbError),

    /// R003: SQL error outside a migration step
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// R004: A migration step failed; nothing after it was run
    #[error("[R004] Migration {migration} failed: {source}")]
    MigrationFailed {
        migration: String,
        #[source]
        source: DbError,
    },

    /// R005: A migration body could not be split into statements
    #[error("[R005] Could not split {migration}: {source}")]
    SplitFailed {
        migration: String,
        #[source]
        source: SqlError,
    },

    /// R006: Reading the pause prompt failed
    #[error("[R006] Pause prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    /// R007: The operator stopped a paused run
    #[error("[R007] Aborted by operator before {migration}")]
    Aborted { migration: String },
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
