//! tm-db - Schema history stores for Tidemark
//!
//! This crate provides the `SchemaStore` trait and its DuckDB and
//! PostgreSQL implementations. Both keep the applied-migration history in a
//! version table whose SQL comes from [`history_sql`].

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod history_sql;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;
pub mod traits;

pub use connect::open_store;
pub use duckdb::DuckDbStore;
pub use error::{DbError, DbResult};
pub use history_sql::HistorySql;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use postgres::{PgSettings, PostgresStore};
pub use traits::{SchemaChange, SchemaStore};
