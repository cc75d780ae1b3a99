//! Scan, plan and execute.
//!
//! A run is strictly sequential. Each migration is split and handed to the
//! store as one transaction; the first failure stops the run and leaves the
//! migrations before it applied.

use crate::error::{RunError, RunResult};
use crate::gate::{NoPause, PromptGate, StepGate};
use crate::report::{RunReport, StepReport};
use tm_core::{
    Dialect, Direction, ExecutionPlan, Migration, MigrationCatalog, MigrationPlanner, PlanRequest,
};
use tm_db::{SchemaChange, SchemaStore};

/// How a run behaves
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Dialect used to split migration bodies
    pub dialect: Dialect,
    /// Confirm before each migration
    pub paused: bool,
    /// Keep executed statements in the report
    pub show_sql: bool,
    /// Report statements without executing anything
    pub show_sql_only: bool,
    /// Drop and recreate the database before anything else
    pub drop_database_first: bool,
}

/// Executes plans against one store
pub struct Runner<'a> {
    store: &'a dyn SchemaStore,
    catalog: &'a MigrationCatalog,
    options: RunOptions,
    gate: Box<dyn StepGate + 'a>,
}

impl<'a> Runner<'a> {
    /// Paused runs prompt on the terminal; use [`Runner::with_gate`] to
    /// answer from elsewhere.
    pub fn new(
        store: &'a dyn SchemaStore,
        catalog: &'a MigrationCatalog,
        options: RunOptions,
    ) -> Self {
        let gate: Box<dyn StepGate> = if options.paused {
            Box::new(PromptGate::stdio())
        } else {
            Box::new(NoPause)
        };
        Self {
            store,
            catalog,
            options,
            gate,
        }
    }

    pub fn with_gate(mut self, gate: impl StepGate + 'a) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Make sure the database and version table exist.
    pub async fn prepare(&self) -> RunResult<()> {
        if self.options.drop_database_first {
            log::info!("Dropping database ({})", self.store.engine());
            self.store.drop_database_if_exists().await?;
        }
        self.store.create_database_if_not_exists().await?;
        self.store.create_version_table_if_not_exists().await?;
        Ok(())
    }

    /// Compute the plan for `request` against the store's current history.
    pub async fn plan(&self, request: PlanRequest) -> RunResult<ExecutionPlan> {
        let history = self.store.history().await?;
        let current = self.store.current_schema_version().await?;
        log::debug!(
            "Current version {current}, {} applied, {} on disk",
            history.entries().len(),
            self.catalog.len()
        );
        let plan = MigrationPlanner::new(self.catalog, &history, current, request).plan()?;
        Ok(plan)
    }

    /// Run every migration of `plan` in order.
    pub async fn execute(&self, plan: &ExecutionPlan) -> RunResult<RunReport> {
        let mut steps = Vec::with_capacity(plan.len());

        for migration in &plan.migrations {
            let statements = migration
                .statements(plan.direction, self.options.dialect)
                .map_err(|source| RunError::SplitFailed {
                    migration: migration.to_string(),
                    source,
                })?;

            if self.options.show_sql_only {
                steps.push(self.step(migration, plan.direction, statements, false));
                continue;
            }

            if self.options.paused && !self.gate.confirm(migration, plan.direction)? {
                return Err(RunError::Aborted {
                    migration: migration.to_string(),
                });
            }

            log::info!("Running {} ({})", migration, plan.direction);
            let change = SchemaChange::new(
                migration,
                plan.direction,
                &statements,
                plan.label.as_ref(),
            );
            self.store
                .change(&change)
                .await
                .map_err(|source| RunError::MigrationFailed {
                    migration: migration.to_string(),
                    source,
                })?;

            let kept = if self.options.show_sql {
                statements
            } else {
                Vec::new()
            };
            steps.push(self.step(migration, plan.direction, kept, true));
        }

        let final_version = self.store.current_schema_version().await?;
        Ok(RunReport {
            direction: plan.direction,
            from: plan.current.clone(),
            to: plan.destination.clone(),
            label: plan.label.clone(),
            steps,
            final_version,
        })
    }

    /// `prepare`, `plan` and `execute` in one go.
    pub async fn run(&self, request: PlanRequest) -> RunResult<RunReport> {
        self.prepare().await?;
        let plan = self.plan(request).await?;
        self.execute(&plan).await
    }

    fn step(
        &self,
        migration: &Migration,
        direction: Direction,
        statements: Vec<String>,
        executed: bool,
    ) -> StepReport {
        StepReport {
            version: migration.version.clone(),
            file_name: migration.file_name.clone(),
            direction,
            statements,
            executed,
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
