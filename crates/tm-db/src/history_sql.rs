//! SQL for the version table.
//!
//! Engines differ only in the id column DDL and in placeholder syntax, so a
//! single builder produces the statements for both.

use crate::error::{DbError, DbResult};
use tm_core::{Label, Migration, Version};

/// Placeholder style of the engine's driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` (DuckDB)
    Question,
    /// `$1, $2, ...` (PostgreSQL)
    Dollar,
}

impl Placeholder {
    fn nth(self, n: usize) -> String {
        match self {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${n}"),
        }
    }
}

/// How the `id` column gets its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// `CREATE SEQUENCE` plus a `nextval` default (DuckDB)
    Sequence,
    /// `BIGSERIAL` (PostgreSQL)
    Serial,
}

/// Columns that may be missing from version tables created by older tools,
/// with their DDL types.
pub const UPGRADE_COLUMNS: [(&str, &str); 4] = [
    ("label", "VARCHAR(255)"),
    ("name", "VARCHAR(255)"),
    ("sql_up", "TEXT"),
    ("sql_down", "TEXT"),
];

/// Statement builder for one version table
#[derive(Debug, Clone)]
pub struct HistorySql {
    table: String,
    quoted: String,
    sequence: String,
    sequence_name: String,
    placeholder: Placeholder,
    ids: IdStrategy,
}

impl HistorySql {
    /// `table` may be schema-qualified (`schema.table`).
    pub fn new(table: &str, placeholder: Placeholder, ids: IdStrategy) -> DbResult<Self> {
        let parts: Vec<&str> = table.split('.').collect();
        if parts.len() > 2 || parts.iter().any(|p| !is_identifier(p)) {
            return Err(DbError::InvalidTableName(table.to_string()));
        }
        let quoted = parts
            .iter()
            .map(|p| quote_ident(p))
            .collect::<Vec<_>>()
            .join(".");
        let bare = parts[parts.len() - 1];
        let sequence_name = match parts.as_slice() {
            [schema, _] => format!("{schema}.{bare}_id_seq"),
            _ => format!("{bare}_id_seq"),
        };
        let sequence = sequence_name
            .split('.')
            .map(quote_ident)
            .collect::<Vec<_>>()
            .join(".");
        Ok(Self {
            table: bare.to_string(),
            quoted,
            sequence,
            sequence_name,
            placeholder,
            ids,
        })
    }

    /// Unqualified table name, as stored in `information_schema`
    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn create_table(&self) -> String {
        let id_column = match self.ids {
            IdStrategy::Sequence => format!(
                "CREATE SEQUENCE IF NOT EXISTS {seq};\n\
                 CREATE TABLE IF NOT EXISTS {table} (\n    \
                 id BIGINT PRIMARY KEY DEFAULT nextval('{seq_name}'),",
                seq = self.sequence,
                table = self.quoted,
                seq_name = self.sequence_name,
            ),
            IdStrategy::Serial => format!(
                "CREATE TABLE IF NOT EXISTS {table} (\n    id BIGSERIAL PRIMARY KEY,",
                table = self.quoted,
            ),
        };
        format!(
            "{id_column}\n    \
             version VARCHAR(20) NOT NULL DEFAULT '0',\n    \
             label VARCHAR(255),\n    \
             name VARCHAR(255),\n    \
             sql_up TEXT,\n    \
             sql_down TEXT\n)"
        )
    }

    /// Column names of the table; one parameter, the table name
    pub fn existing_columns(&self) -> String {
        format!(
            "SELECT column_name FROM information_schema.columns WHERE table_name = {}",
            self.placeholder.nth(1)
        )
    }

    pub fn add_column(&self, column: &str, ddl_type: &str) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.quoted,
            quote_ident(column),
            ddl_type
        )
    }

    pub fn count_rows(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.quoted)
    }

    /// The bootstrap row marking version `"0"`
    pub fn insert_bootstrap(&self) -> String {
        format!("INSERT INTO {} (version) VALUES ('0')", self.quoted)
    }

    /// Parameters: version, label, name, sql_up, sql_down
    pub fn insert_migration(&self) -> String {
        let params: Vec<String> = (1..=5).map(|n| self.placeholder.nth(n)).collect();
        format!(
            "INSERT INTO {} (version, label, name, sql_up, sql_down) VALUES ({})",
            self.quoted,
            params.join(", ")
        )
    }

    /// Parameter: version
    pub fn delete_version(&self) -> String {
        format!(
            "DELETE FROM {} WHERE version = {}",
            self.quoted,
            self.placeholder.nth(1)
        )
    }

    pub fn current_version(&self) -> String {
        format!(
            "SELECT version FROM {} ORDER BY id DESC LIMIT 1",
            self.quoted
        )
    }

    pub fn all_versions(&self) -> String {
        format!("SELECT version FROM {} ORDER BY id", self.quoted)
    }

    pub fn all_migrations(&self) -> String {
        format!(
            "SELECT id, version, label, name, sql_up, sql_down FROM {} ORDER BY id",
            self.quoted
        )
    }

    /// Parameter: version
    pub fn id_for_version(&self) -> String {
        format!(
            "SELECT MAX(id) FROM {} WHERE version = {}",
            self.quoted,
            self.placeholder.nth(1)
        )
    }

    /// Parameter: label
    pub fn version_for_label(&self) -> String {
        format!(
            "SELECT version FROM {} WHERE label = {} ORDER BY id DESC LIMIT 1",
            self.quoted,
            self.placeholder.nth(1)
        )
    }
}

/// A version table row as read from any engine
pub(crate) struct HistoryRow {
    pub id: i64,
    pub version: String,
    pub label: Option<String>,
    pub name: Option<String>,
    pub sql_up: Option<String>,
    pub sql_down: Option<String>,
}

impl HistoryRow {
    pub(crate) fn into_migration(self) -> DbResult<Migration> {
        let version = parse_version(self.version)?;
        Ok(Migration::from_history(
            self.id,
            version,
            self.label.and_then(Label::try_new),
            self.name.unwrap_or_default(),
            self.sql_up.unwrap_or_default(),
            self.sql_down.unwrap_or_default(),
        ))
    }
}

pub(crate) fn parse_version(raw: String) -> DbResult<Version> {
    Version::try_new(raw).ok_or_else(|| DbError::CorruptHistory("empty version".to_string()))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
#[path = "history_sql_test.rs"]
mod tests;
