//! tm-core - Core library for Tidemark
//!
//! This crate provides configuration parsing, the migration file format,
//! the on-disk migration catalog, the applied-history snapshot, and the
//! planner that turns both into an ordered execution plan.

pub mod catalog;
pub mod config;
pub mod encoding;
pub mod error;
pub mod history;
pub mod migration;
pub mod migration_file;
pub mod planner;
pub mod version;

mod newtype_string;

pub use catalog::MigrationCatalog;
pub use config::{Config, DatabaseConfig, Engine};
pub use encoding::FileEncoding;
pub use error::{CoreError, CoreResult};
pub use history::SchemaHistory;
pub use migration::{Direction, Migration};
pub use planner::{Destination, ExecutionPlan, MigrationPlanner, PlanRequest};
pub use version::{Label, Version};
pub use tm_sql::Dialect;
