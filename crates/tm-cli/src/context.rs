//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use tm_core::{Config, CoreError, Dialect, MigrationCatalog};
use tm_db::SchemaStore;

use crate::cli::GlobalArgs;

/// Environment variable holding the database password
pub(crate) const PASSWORD_ENV_VAR: &str = "TIDEMARK_DB_PASSWORD";

/// Configuration, migrations on disk and an open store
pub(crate) struct RuntimeContext {
    pub config: Config,
    pub catalog: MigrationCatalog,
    pub store: Box<dyn SchemaStore>,
}

impl RuntimeContext {
    /// Load the configuration, scan the catalog and open the store.
    pub(crate) fn new(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(global)?;
        let catalog = scan_catalog(&config)?;
        let store = tm_db::open_store(&config).context("Failed to open the database")?;
        Ok(Self {
            config,
            catalog,
            store,
        })
    }
}

/// Resolve the effective configuration for this invocation.
///
/// Order: config file (or defaults when there is none and no `--config`),
/// then the selected environment, then CLI flags and `TIDEMARK_DB_PASSWORD`.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let base = match &global.config {
        Some(path) => Config::load(Path::new(path)).context("Failed to load configuration file")?,
        None => match Config::load_from_dir(Path::new(".")) {
            Ok(config) => config,
            Err(CoreError::ConfigNotFound { path }) => {
                log::info!("No configuration at {path}, using defaults");
                Config::default()
            }
            Err(e) => return Err(e).context("Failed to load project configuration"),
        },
    };

    let environment = Config::resolve_environment(global.env.as_deref());
    let mut config = base
        .with_environment(environment.as_deref())
        .context("Failed to apply environment")?;
    if let Some(name) = &environment {
        log::debug!("Using environment '{name}'");
    }

    let password = std::env::var(PASSWORD_ENV_VAR)
        .ok()
        .filter(|p| !p.is_empty());
    apply_overrides(&mut config, global, password)?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Apply CLI flags and an externally supplied password on top of `config`.
pub(crate) fn apply_overrides(
    config: &mut Config,
    global: &GlobalArgs,
    password: Option<String>,
) -> Result<()> {
    if let Some(dirs) = &global.migrations_dir {
        // CLI paths are relative to the working directory, not the config file.
        config.migrations_dir = dirs
            .split(':')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| {
                std::path::absolute(d)
                    .map(|p| p.display().to_string())
                    .with_context(|| format!("Invalid migrations directory: {d}"))
            })
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(name) = &global.dialect {
        let dialect: Dialect = name.parse().context("Invalid --dialect")?;
        config.dialect = Some(dialect);
    }
    if password.is_some() {
        config.database.password = password;
    }
    Ok(())
}

/// Scan every configured migrations directory.
pub(crate) fn scan_catalog(config: &Config) -> Result<MigrationCatalog> {
    let dirs = config.migrations_dirs_absolute();
    MigrationCatalog::scan(&dirs, config.encoding).context("Failed to load migrations")
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
