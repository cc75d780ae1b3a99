//! The migration value shared by the catalog, the history and the planner

use crate::version::{Label, Version};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use tm_sql::{split_statements, Dialect, SqlResult};

/// Direction a migration is executed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One schema change with its forward and reverse SQL.
///
/// File-backed migrations carry `abs_path` and no `id`. Migrations read back
/// from the history table carry the row `id` and may lack a path.
#[derive(Debug, Clone, Serialize)]
pub struct Migration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub version: Version,
    pub title: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<PathBuf>,
    pub sql_up: String,
    pub sql_down: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl Migration {
    /// Build a migration from a history row.
    pub fn from_history(
        id: i64,
        version: Version,
        label: Option<Label>,
        file_name: impl Into<String>,
        sql_up: impl Into<String>,
        sql_down: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            id: Some(id),
            title: title_from_file_name(&file_name),
            version,
            file_name,
            abs_path: None,
            sql_up: sql_up.into(),
            sql_down: sql_down.into(),
            label,
        }
    }

    /// Catalog ordering: by version, then by file name.
    pub fn compare(&self, other: &Migration) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.file_name.cmp(&other.file_name))
    }

    /// Raw SQL text for one direction
    pub fn sql(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.sql_up,
            Direction::Down => &self.sql_down,
        }
    }

    /// Split the SQL for one direction into executable statements.
    pub fn statements(&self, direction: Direction, dialect: Dialect) -> SqlResult<Vec<String>> {
        split_statements(self.sql(direction), dialect)
    }

    /// Copy of this history entry with SQL and file name taken from `file`.
    ///
    /// The row id and label are kept so the planner can still order by id.
    pub fn with_sql_from_file(&self, file: &Migration) -> Migration {
        Migration {
            id: self.id,
            version: self.version.clone(),
            title: file.title.clone(),
            file_name: file.file_name.clone(),
            abs_path: file.abs_path.clone(),
            sql_up: file.sql_up.clone(),
            sql_down: file.sql_down.clone(),
            label: self.label.clone(),
        }
    }

    pub fn has_down_sql(&self) -> bool {
        !self.sql_down.trim().is_empty()
    }
}

/// Two migrations are equal when their content is. Row id and file
/// location do not take part.
impl PartialEq for Migration {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.file_name == other.file_name
            && self.sql_up == other.sql_up
            && self.sql_down == other.sql_down
            && self.label == other.label
    }
}

impl Eq for Migration {}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_name.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}", self.file_name)
        }
    }
}

/// `20090212112104_add_users.migration` -> `add_users`
pub(crate) fn title_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    stem.split_once('_')
        .map_or(stem, |(_, title)| title)
        .to_string()
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
