//! Schema store trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use tm_core::{Direction, Label, Migration, SchemaHistory, Version};

/// One migration step handed to [`SchemaStore::change`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaChange<'a> {
    /// Already-split statements for `direction`
    pub statements: &'a [String],
    pub version: &'a Version,
    pub file_name: &'a str,
    pub sql_up: &'a str,
    pub sql_down: &'a str,
    pub direction: Direction,
    pub label: Option<&'a Label>,
}

impl<'a> SchemaChange<'a> {
    pub fn new(
        migration: &'a Migration,
        direction: Direction,
        statements: &'a [String],
        label: Option<&'a Label>,
    ) -> Self {
        Self {
            statements,
            version: &migration.version,
            file_name: &migration.file_name,
            sql_up: &migration.sql_up,
            sql_down: &migration.sql_down,
            direction,
            label,
        }
    }
}

/// Storage for the applied-migration history, one implementation per engine.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Engine name for logging
    fn engine(&self) -> &'static str;

    /// Name of the version table
    fn version_table(&self) -> &str;

    async fn create_database_if_not_exists(&self) -> DbResult<()>;

    async fn drop_database_if_exists(&self) -> DbResult<()>;

    /// Create the version table with its bootstrap `"0"` row, or add any
    /// columns an older table lacks.
    async fn create_version_table_if_not_exists(&self) -> DbResult<()>;

    /// Run the statements and record (up) or delete (down) the history row,
    /// atomically.
    async fn change(&self, change: &SchemaChange<'_>) -> DbResult<()>;

    /// Version of the most recently applied row
    async fn current_schema_version(&self) -> DbResult<Version>;

    /// Applied versions in application order
    async fn all_schema_versions(&self) -> DbResult<Vec<Version>>;

    /// Full history rows with their SQL, in application order
    async fn all_schema_migrations(&self) -> DbResult<Vec<Migration>>;

    /// Highest row id recorded for `version`
    async fn version_id_for_version_number(&self, version: &str) -> DbResult<Option<i64>>;

    /// Version of the most recent row tagged with `label`
    async fn version_number_for_label(&self, label: &str) -> DbResult<Option<Version>>;

    /// Snapshot of the history for planning
    async fn history(&self) -> DbResult<SchemaHistory> {
        Ok(SchemaHistory::new(self.all_schema_migrations().await?))
    }
}
