//! Snapshot of the applied-migration history table

use crate::migration::Migration;
use crate::version::Version;

/// Applied migrations in insertion (id) order.
///
/// A version may appear more than once when it was applied, rolled back and
/// applied again; lookups always return the newest row.
#[derive(Debug, Clone, Default)]
pub struct SchemaHistory {
    entries: Vec<Migration>,
}

impl SchemaHistory {
    pub fn new(mut entries: Vec<Migration>) -> Self {
        entries.sort_by_key(|m| m.id.unwrap_or_default());
        Self { entries }
    }

    pub fn entries(&self) -> &[Migration] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Version of the newest row, `"0"` for an empty history
    pub fn current_version(&self) -> Version {
        self.entries
            .last()
            .map(|m| m.version.clone())
            .unwrap_or_else(Version::zero)
    }

    /// Applied versions in id order
    pub fn versions(&self) -> Vec<Version> {
        self.entries.iter().map(|m| m.version.clone()).collect()
    }

    pub fn contains(&self, version: &str) -> bool {
        self.entries.iter().any(|m| m.version == version)
    }

    /// Highest row id recorded for `version`
    pub fn id_for_version(&self, version: &str) -> Option<i64> {
        self.entries
            .iter()
            .rev()
            .find(|m| m.version == version)
            .and_then(|m| m.id)
    }

    /// Version of the newest row tagged with `label`
    pub fn version_for_label(&self, label: &str) -> Option<Version> {
        self.newest_with_label(label).map(|m| m.version.clone())
    }

    /// Row id of the newest row tagged with `label`
    pub fn id_for_label(&self, label: &str) -> Option<i64> {
        self.newest_with_label(label).and_then(|m| m.id)
    }

    /// Rows newer than `id`, oldest first
    pub fn entries_after(&self, id: i64) -> impl Iterator<Item = &Migration> {
        self.entries
            .iter()
            .filter(move |m| m.id.is_some_and(|row| row > id))
    }

    fn newest_with_label(&self, label: &str) -> Option<&Migration> {
        self.entries
            .iter()
            .rev()
            .find(|m| m.label.as_deref() == Some(label))
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
