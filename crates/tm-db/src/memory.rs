//! In-memory schema store for tests.
//!
//! Records every executed statement and can be told to fail on a statement,
//! which lets runner tests check abort-on-first-error without a database.

use crate::error::{DbError, DbResult};
use crate::traits::{SchemaChange, SchemaStore};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use tm_core::{Direction, Migration, Version};

#[derive(Debug, Default)]
struct MemoryState {
    table_created: bool,
    rows: Vec<Migration>,
    next_id: i64,
    executed: Vec<String>,
    fail_on: Option<String>,
    drops: usize,
}

/// A [`SchemaStore`] that keeps the history in a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement containing `needle`.
    pub fn fail_on(&self, needle: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_on = Some(needle.to_string());
        }
    }

    /// Statements executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.executed.clone())
            .unwrap_or_default()
    }

    /// Number of `drop_database_if_exists` calls
    pub fn drops(&self) -> usize {
        self.state.lock().map(|state| state.drops).unwrap_or_default()
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn ensure_table(state: &MemoryState) -> DbResult<()> {
        if state.table_created {
            Ok(())
        } else {
            Err(DbError::ExecutionError(
                "version table does not exist".to_string(),
            ))
        }
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    fn engine(&self) -> &'static str {
        "memory"
    }

    fn version_table(&self) -> &str {
        "__db_version__"
    }

    async fn create_database_if_not_exists(&self) -> DbResult<()> {
        Ok(())
    }

    async fn drop_database_if_exists(&self) -> DbResult<()> {
        let mut state = self.lock()?;
        let fail_on = state.fail_on.take();
        let drops = state.drops + 1;
        *state = MemoryState {
            fail_on,
            drops,
            ..MemoryState::default()
        };
        Ok(())
    }

    async fn create_version_table_if_not_exists(&self) -> DbResult<()> {
        let mut state = self.lock()?;
        if !state.table_created {
            state.table_created = true;
            state.next_id = 2;
            state.rows.push(Migration::from_history(1, Version::zero(), None, "", "", ""));
        }
        Ok(())
    }

    async fn change(&self, change: &SchemaChange<'_>) -> DbResult<()> {
        let mut state = self.lock()?;
        Self::ensure_table(&state)?;
        for statement in change.statements {
            if let Some(needle) = &state.fail_on {
                if statement.contains(needle.as_str()) {
                    return Err(DbError::StatementFailed {
                        statement: statement.clone(),
                        message: format!("injected failure on '{needle}'"),
                    });
                }
            }
            state.executed.push(statement.clone());
        }
        match change.direction {
            Direction::Up => {
                let id = state.next_id;
                state.next_id += 1;
                state.rows.push(Migration::from_history(
                    id,
                    change.version.clone(),
                    change.label.cloned(),
                    change.file_name,
                    change.sql_up,
                    change.sql_down,
                ));
            }
            Direction::Down => state.rows.retain(|row| &row.version != change.version),
        }
        Ok(())
    }

    async fn current_schema_version(&self) -> DbResult<Version> {
        let state = self.lock()?;
        Self::ensure_table(&state)?;
        Ok(state
            .rows
            .last()
            .map(|row| row.version.clone())
            .unwrap_or_else(Version::zero))
    }

    async fn all_schema_versions(&self) -> DbResult<Vec<Version>> {
        let state = self.lock()?;
        Self::ensure_table(&state)?;
        Ok(state.rows.iter().map(|row| row.version.clone()).collect())
    }

    async fn all_schema_migrations(&self) -> DbResult<Vec<Migration>> {
        let state = self.lock()?;
        Self::ensure_table(&state)?;
        Ok(state.rows.clone())
    }

    async fn version_id_for_version_number(&self, version: &str) -> DbResult<Option<i64>> {
        let state = self.lock()?;
        Self::ensure_table(&state)?;
        Ok(state
            .rows
            .iter()
            .rev()
            .find(|row| row.version == version)
            .and_then(|row| row.id))
    }

    async fn version_number_for_label(&self, label: &str) -> DbResult<Option<Version>> {
        let state = self.lock()?;
        Self::ensure_table(&state)?;
        Ok(state
            .rows
            .iter()
            .rev()
            .find(|row| row.label.as_deref() == Some(label))
            .map(|row| row.version.clone()))
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
