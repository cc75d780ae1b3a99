//! tm-run - Migration runner for Tidemark
//!
//! Ties a [`tm_db::SchemaStore`] and a [`tm_core::MigrationCatalog`]
//! together: prepare the version table, plan, then execute the plan one
//! migration at a time, stopping at the first failure.

pub mod error;
pub mod gate;
pub mod report;
pub mod runner;

pub use error::{RunError, RunResult};
pub use gate::{NoPause, PromptGate, StepGate};
pub use report::{RunReport, StepReport};
pub use runner::{RunOptions, Runner};
