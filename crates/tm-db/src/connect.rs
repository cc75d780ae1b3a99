//! Store selection from configuration

use crate::duckdb::DuckDbStore;
use crate::error::DbResult;
use crate::postgres::{PgSettings, PostgresStore};
use crate::traits::SchemaStore;
use tm_core::{Config, Engine};

/// Open the store for the configured engine.
pub fn open_store(config: &Config) -> DbResult<Box<dyn SchemaStore>> {
    let database = &config.database;
    let store: Box<dyn SchemaStore> = match database.engine {
        Engine::DuckDb => Box::new(DuckDbStore::new(
            &config.duckdb_path(),
            &database.version_table,
        )?),
        Engine::PostgreSql => Box::new(PostgresStore::new(
            PgSettings::from_config(database)?,
            &database.version_table,
        )?),
    };
    log::debug!(
        "Using {} store with version table {}",
        store.engine(),
        store.version_table()
    );
    Ok(store)
}

#[cfg(test)]
#[path = "connect_test.rs"]
mod tests;
