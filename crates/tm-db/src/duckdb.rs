//! DuckDB schema store

use crate::error::{DbError, DbResult};
use crate::history_sql::{
    parse_version, HistoryRow, HistorySql, IdStrategy, Placeholder, UPGRADE_COLUMNS,
};
use crate::traits::{SchemaChange, SchemaStore};
use async_trait::async_trait;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tm_core::{Direction, Label, Migration, Version};

const MEMORY_PATH: &str = ":memory:";

/// DuckDB-backed history store.
///
/// One connection is held for the store's lifetime; an in-memory database
/// would not survive reconnecting.
pub struct DuckDbStore {
    path: String,
    conn: Mutex<Connection>,
    sql: HistorySql,
}

impl DuckDbStore {
    /// Open an in-memory database
    pub fn in_memory(version_table: &str) -> DbResult<Self> {
        Self::new(MEMORY_PATH, version_table)
    }

    /// Open a file database (handles `:memory:`)
    pub fn new(path: &str, version_table: &str) -> DbResult<Self> {
        let sql = HistorySql::new(version_table, Placeholder::Question, IdStrategy::Sequence)?;
        let conn = open_connection(path)?;
        log::debug!("Opened DuckDB database {path}");
        Ok(Self {
            path: path.to_string(),
            conn: Mutex::new(conn),
            sql,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn create_version_table_sync(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&self.sql.create_table())?;

        let mut stmt = conn.prepare(&self.sql.existing_columns())?;
        let columns: Vec<String> = stmt
            .query_map(params![self.sql.table_name()], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        for (column, ddl_type) in UPGRADE_COLUMNS {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                log::info!(
                    "Adding missing column {column} to {}",
                    self.sql.table_name()
                );
                conn.execute_batch(&self.sql.add_column(column, ddl_type))?;
            }
        }

        let rows: i64 = conn.query_row(&self.sql.count_rows(), [], |row| row.get(0))?;
        if rows == 0 {
            conn.execute_batch(&self.sql.insert_bootstrap())?;
        }
        Ok(())
    }

    fn change_sync(&self, change: &SchemaChange<'_>) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = self.apply_change(&conn, change);
        match result {
            Ok(()) => conn.execute_batch("COMMIT").map_err(|e| {
                let _ = conn.execute_batch("ROLLBACK");
                DbError::TransactionError(format!("COMMIT failed: {e}"))
            }),
            Err(err) => {
                if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    fn apply_change(&self, conn: &Connection, change: &SchemaChange<'_>) -> DbResult<()> {
        for statement in change.statements {
            log::debug!("Executing: {statement}");
            conn.execute_batch(statement)
                .map_err(|e| DbError::StatementFailed {
                    statement: statement.clone(),
                    message: e.to_string(),
                })?;
        }
        match change.direction {
            Direction::Up => {
                conn.execute(
                    &self.sql.insert_migration(),
                    params![
                        change.version.as_str(),
                        change.label.map(Label::as_str),
                        change.file_name,
                        change.sql_up,
                        change.sql_down
                    ],
                )?;
            }
            Direction::Down => {
                conn.execute(&self.sql.delete_version(), params![change.version.as_str()])?;
            }
        }
        Ok(())
    }

    fn query_versions(&self, sql: &str) -> DbResult<Vec<Version>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let raw: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;
        raw.into_iter().map(parse_version).collect()
    }

    fn all_migrations_sync(&self) -> DbResult<Vec<Migration>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&self.sql.all_migrations())?;
        let rows: Vec<HistoryRow> = stmt
            .query_map([], |row| {
                Ok(HistoryRow {
                    id: row.get(0)?,
                    version: row.get(1)?,
                    label: row.get(2)?,
                    name: row.get(3)?,
                    sql_up: row.get(4)?,
                    sql_down: row.get(5)?,
                })
            })?
            .collect::<Result<_, _>>()?;
        rows.into_iter().map(HistoryRow::into_migration).collect()
    }

    fn drop_database_sync(&self) -> DbResult<()> {
        let mut conn = self.lock()?;
        // Release the file handle before deleting the file.
        let fresh = Connection::open_in_memory()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        drop(std::mem::replace(&mut *conn, fresh));

        if self.path != MEMORY_PATH {
            for file in [self.path.clone(), format!("{}.wal", self.path)] {
                match std::fs::remove_file(&file) {
                    Ok(()) => log::info!("Removed {file}"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(DbError::ExecutionError(format!(
                            "failed to remove {file}: {e}"
                        )))
                    }
                }
            }
            *conn = open_connection(&self.path)?;
        }
        Ok(())
    }
}

fn open_connection(path: &str) -> DbResult<Connection> {
    if path == MEMORY_PATH {
        return Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()));
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| DbError::ConnectionError(format!("{}: {e}", parent.display())))?;
    }
    Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))
}

#[async_trait]
impl SchemaStore for DuckDbStore {
    fn engine(&self) -> &'static str {
        "duckdb"
    }

    fn version_table(&self) -> &str {
        self.sql.table_name()
    }

    async fn create_database_if_not_exists(&self) -> DbResult<()> {
        // Opening the connection already created the file.
        Ok(())
    }

    async fn drop_database_if_exists(&self) -> DbResult<()> {
        self.drop_database_sync()
    }

    async fn create_version_table_if_not_exists(&self) -> DbResult<()> {
        self.create_version_table_sync()
    }

    async fn change(&self, change: &SchemaChange<'_>) -> DbResult<()> {
        self.change_sync(change)
    }

    async fn current_schema_version(&self) -> DbResult<Version> {
        let versions = self.query_versions(&self.sql.current_version())?;
        Ok(versions.into_iter().next().unwrap_or_else(Version::zero))
    }

    async fn all_schema_versions(&self) -> DbResult<Vec<Version>> {
        self.query_versions(&self.sql.all_versions())
    }

    async fn all_schema_migrations(&self) -> DbResult<Vec<Migration>> {
        self.all_migrations_sync()
    }

    async fn version_id_for_version_number(&self, version: &str) -> DbResult<Option<i64>> {
        let conn = self.lock()?;
        let id: Option<i64> =
            conn.query_row(&self.sql.id_for_version(), params![version], |row| row.get(0))?;
        Ok(id)
    }

    async fn version_number_for_label(&self, label: &str) -> DbResult<Option<Version>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&self.sql.version_for_label())?;
        let mut rows = stmt.query(params![label])?;
        match rows.next()? {
            Some(row) => {
                let raw: String = row.get(0)?;
                Ok(Some(parse_version(raw)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
