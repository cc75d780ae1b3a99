//! The set of migrations found on disk

use crate::encoding::FileEncoding;
use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::migration_file::{self, MIGRATION_EXTENSION};
use crate::version::Version;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Migrations loaded from one or more directories, sorted by version.
///
/// Versions are unique: when two directories hold the same version, the one
/// scanned last replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct MigrationCatalog {
    migrations: Vec<Migration>,
}

impl MigrationCatalog {
    /// Scan `dirs` (non-recursively) and load every migration file.
    ///
    /// Files with a `.migration` extension but an invalid name are skipped
    /// with a warning. Any other file is ignored.
    pub fn scan(dirs: &[PathBuf], encoding: FileEncoding) -> CoreResult<Self> {
        let mut by_version: BTreeMap<Version, Migration> = BTreeMap::new();

        for dir in dirs {
            for path in migration_paths(dir)? {
                let migration = migration_file::load(&path, encoding)?;
                if let Some(previous) = by_version.insert(migration.version.clone(), migration) {
                    log::warn!(
                        "Duplicate migration version {}: {} is replaced by {}",
                        previous.version,
                        previous.file_name,
                        path.display()
                    );
                }
            }
        }

        if by_version.is_empty() {
            return Err(CoreError::NoMigrationsFound {
                dirs: dirs
                    .iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let catalog = Self::from_migrations(by_version.into_values().collect());
        log::debug!(
            "Loaded {} migrations from {} directories",
            catalog.len(),
            dirs.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-loaded migrations.
    ///
    /// A later migration replaces an earlier one with the same version.
    pub fn from_migrations(migrations: Vec<Migration>) -> Self {
        let mut by_version: BTreeMap<Version, Migration> = BTreeMap::new();
        for migration in migrations {
            by_version.insert(migration.version.clone(), migration);
        }
        let mut migrations: Vec<Migration> = by_version.into_values().collect();
        migrations.sort_by(Migration::compare);
        Self { migrations }
    }

    /// All migrations, ascending by version
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// All versions, ascending
    pub fn all_versions(&self) -> Vec<Version> {
        self.migrations.iter().map(|m| m.version.clone()).collect()
    }

    /// Versions strictly below `limit`, ascending
    pub fn versions_before(&self, limit: &str) -> Vec<Version> {
        self.migrations
            .iter()
            .filter(|m| m.version.as_str() < limit)
            .map(|m| m.version.clone())
            .collect()
    }

    /// Exact version match
    pub fn exists(&self, version: &str) -> bool {
        self.get(version).is_some()
    }

    pub fn get(&self, version: &str) -> Option<&Migration> {
        self.migrations
            .binary_search_by(|m| m.version.as_str().cmp(version))
            .ok()
            .map(|i| &self.migrations[i])
    }

    /// Highest version on disk
    pub fn latest(&self) -> Option<&Version> {
        self.migrations.last().map(|m| &m.version)
    }
}

/// Migration files directly inside `dir`, sorted by file name.
fn migration_paths(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(MIGRATION_EXTENSION));
        if !has_extension {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !migration_file::is_migration_file_name(&file_name) {
            log::warn!(
                "Skipping {}: expected a YYYYMMDDHHMMSS_title.migration file name",
                path.display()
            );
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
