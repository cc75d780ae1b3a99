//! Turns the catalog, the applied history and a request into an ordered plan.
//!
//! Planning is a small state machine:
//!
//! ```text
//! ResolveDestination -> ChooseDirection -> CollectUp   -> Done
//!                                       \-> CollectDown -> Done
//! ```
//!
//! Each state is a pure function of the inputs, so a plan can be computed
//! (and shown) without touching the database.

use crate::catalog::MigrationCatalog;
use crate::error::{CoreError, CoreResult};
use crate::history::SchemaHistory;
use crate::migration::{Direction, Migration};
use crate::version::{Label, Version};
use serde::Serialize;

/// What the caller asked for
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    /// Target version; latest on disk when absent
    pub version: Option<Version>,
    /// Label to resolve against the history, and to tag applied rows with
    pub label: Option<Label>,
    /// Collect unapplied files even when already at the destination
    pub force_old_migrations: bool,
    /// Take down SQL from files even when the history has it
    pub force_files_on_down: bool,
}

/// The resolved target of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub version: Version,
    /// Whether the caller named it (a version, or a label found in history)
    pub explicit: bool,
}

/// Ordered migrations to execute in one direction
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
    pub direction: Direction,
    pub current: Version,
    pub destination: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub migrations: Vec<Migration>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }
}

enum PlanState {
    ResolveDestination,
    ChooseDirection(Destination),
    Collect(Direction, Version),
    Done(ExecutionPlan),
}

/// Computes an [`ExecutionPlan`] from borrowed snapshots.
pub struct MigrationPlanner<'a> {
    catalog: &'a MigrationCatalog,
    history: &'a SchemaHistory,
    current: Version,
    request: PlanRequest,
}

impl<'a> MigrationPlanner<'a> {
    /// `current` is the store's current version; it normally equals
    /// `history.current_version()`.
    pub fn new(
        catalog: &'a MigrationCatalog,
        history: &'a SchemaHistory,
        current: Version,
        request: PlanRequest,
    ) -> Self {
        Self {
            catalog,
            history,
            current,
            request,
        }
    }

    pub fn plan(&self) -> CoreResult<ExecutionPlan> {
        let mut state = PlanState::ResolveDestination;
        loop {
            state = match state {
                PlanState::ResolveDestination => {
                    PlanState::ChooseDirection(self.resolve_destination()?)
                }
                PlanState::ChooseDirection(destination) => {
                    let direction = self.choose_direction(&destination)?;
                    PlanState::Collect(direction, destination.version)
                }
                PlanState::Collect(direction, destination) => {
                    let migrations = match direction {
                        Direction::Up => self.collect_up(&destination),
                        Direction::Down => self.collect_down(&destination)?,
                    };
                    PlanState::Done(ExecutionPlan {
                        direction,
                        current: self.current.clone(),
                        destination,
                        label: self.request.label.clone(),
                        migrations,
                    })
                }
                PlanState::Done(plan) => {
                    log::info!(
                        "Planned {} migration(s) {} from {} to {}",
                        plan.len(),
                        plan.direction,
                        plan.current,
                        plan.destination
                    );
                    return Ok(plan);
                }
            };
        }
    }

    /// Work out the destination version from the requested version/label.
    pub fn resolve_destination(&self) -> CoreResult<Destination> {
        let request = &self.request;
        let destination = match (&request.version, &request.label) {
            (None, None) => Destination {
                version: self.latest(),
                explicit: false,
            },
            (Some(version), None) => Destination {
                version: version.clone(),
                explicit: true,
            },
            (None, Some(label)) => match self.history.version_for_label(label) {
                Some(version) => {
                    log::debug!("Label {label} resolves to version {version}");
                    Destination {
                        version,
                        explicit: true,
                    }
                }
                None => Destination {
                    version: self.latest(),
                    explicit: false,
                },
            },
            (Some(version), Some(label)) => {
                let version_id = self.history.id_for_version(version);
                let label_id = self.history.id_for_label(label);
                match (version_id, label_id) {
                    (None, None) => {}
                    (Some(a), Some(b)) if a == b => {}
                    (Some(_), Some(_)) => {
                        return Err(CoreError::LabelVersionConflict {
                            label: label.to_string(),
                            version: version.to_string(),
                        })
                    }
                    _ => {
                        return Err(CoreError::LabelVersionMismatch {
                            label: label.to_string(),
                            version: version.to_string(),
                        })
                    }
                }
                Destination {
                    version: version.clone(),
                    explicit: true,
                }
            }
        };

        if request.version.is_some()
            && !destination.version.is_zero()
            && !self.catalog.exists(&destination.version)
        {
            return Err(CoreError::VersionNotFound {
                version: destination.version.to_string(),
            });
        }

        Ok(destination)
    }

    /// Down when an explicit destination is an older history row, up otherwise.
    pub fn choose_direction(&self, destination: &Destination) -> CoreResult<Direction> {
        if !destination.explicit {
            return Ok(Direction::Up);
        }
        match self.destination_id(&destination.version) {
            Some(destination_id) => {
                let current_id = self.history.id_for_version(&self.current).unwrap_or(0);
                if current_id > destination_id {
                    Ok(Direction::Down)
                } else {
                    Ok(Direction::Up)
                }
            }
            None if self.current > destination.version => {
                Err(CoreError::CannotMigrateToUnknownLowerVersion {
                    current: self.current.to_string(),
                    destination: destination.version.to_string(),
                })
            }
            None => Ok(Direction::Up),
        }
    }

    /// Catalog migrations missing from the history, up to `destination`.
    ///
    /// Unapplied files older than the current version are included too.
    fn collect_up(&self, destination: &Version) -> Vec<Migration> {
        if self.is_same_version(destination) {
            return Vec::new();
        }
        self.catalog
            .migrations()
            .iter()
            .filter(|m| &m.version <= destination)
            .filter(|m| !self.history.contains(&m.version))
            .cloned()
            .collect()
    }

    /// History rows newer than `destination`, newest first, with down SQL
    /// backfilled from the catalog where needed.
    fn collect_down(&self, destination: &Version) -> CoreResult<Vec<Migration>> {
        if self.is_same_version(destination) {
            return Ok(Vec::new());
        }
        let destination_id = self.destination_id(destination).unwrap_or(0);

        let mut migrations = Vec::new();
        for entry in self.history.entries_after(destination_id) {
            if entry.has_down_sql() && !self.request.force_files_on_down {
                migrations.push(entry.clone());
                continue;
            }
            let file = self.catalog.get(&entry.version).ok_or_else(|| {
                CoreError::ImpossibleDownMigration {
                    version: entry.version.to_string(),
                }
            })?;
            migrations.push(entry.with_sql_from_file(file));
        }
        migrations.reverse();
        Ok(migrations)
    }

    fn is_same_version(&self, destination: &Version) -> bool {
        let same = self.current == *destination && !self.request.force_old_migrations;
        if same {
            log::info!("Database is already at version {destination}");
        }
        same
    }

    /// History id of the destination. `"0"` sits below every row even when
    /// the history has no bootstrap entry.
    fn destination_id(&self, version: &Version) -> Option<i64> {
        self.history
            .id_for_version(version)
            .or_else(|| version.is_zero().then_some(0))
    }

    fn latest(&self) -> Version {
        self.catalog.latest().cloned().unwrap_or_else(Version::zero)
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
