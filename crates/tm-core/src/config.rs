//! Configuration types and parsing for tidemark.yml

use crate::encoding::FileEncoding;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tm_sql::Dialect;

/// File names probed by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["tidemark.yml", "tidemark.yaml"];

/// Environment variable selecting an entry of `environments`
pub const ENV_VAR: &str = "TIDEMARK_ENV";

/// Main configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories scanned for `.migration` files, relative to the config file
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: Vec<String>,

    /// SQL dialect of the migration bodies. Derived from the engine when unset.
    #[serde(default)]
    pub dialect: Option<Dialect>,

    /// Encoding of migration files
    #[serde(default)]
    pub encoding: FileEncoding,

    /// Stamp new migrations with UTC instead of local time
    #[serde(default)]
    pub utc_timestamp: bool,

    /// Plan unapplied files even when already at the requested version
    #[serde(default)]
    pub force_execute_old_migrations_versions: bool,

    /// Always take down SQL from the migration files, ignoring stored SQL
    #[serde(default)]
    pub force_use_files_on_down: bool,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named overrides (e.g. dev, staging, prod)
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,

    /// Directory the configuration was loaded from
    #[serde(skip)]
    pub root: PathBuf,
}

/// Environment-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Migration directories override
    #[serde(default)]
    pub migrations_dir: Option<Vec<String>>,

    /// Dialect override
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

/// Database engine selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// PostgreSQL
    #[serde(alias = "postgres")]
    PostgreSql,
}

impl Engine {
    /// Dialect assumed for migration bodies when none is configured
    pub fn default_dialect(&self) -> Dialect {
        match self {
            Engine::DuckDb => Dialect::DuckDb,
            Engine::PostgreSql => Dialect::PostgreSql,
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::DuckDb => write!(f, "duckdb"),
            Engine::PostgreSql => write!(f, "postgresql"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub engine: Engine,

    /// DuckDB file path or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// PostgreSQL database name
    #[serde(default)]
    pub name: Option<String>,

    /// Table holding the applied-migration history
    #[serde(default = "default_version_table")]
    pub version_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            path: default_db_path(),
            host: None,
            port: default_port(),
            user: None,
            password: None,
            name: None,
            version_table: default_version_table(),
        }
    }
}

impl DatabaseConfig {
    fn validate(&self) -> CoreResult<()> {
        if self.version_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.version_table cannot be empty".to_string(),
            });
        }
        if self.engine == Engine::PostgreSql {
            let missing: Vec<&str> = [
                ("host", &self.host),
                ("name", &self.name),
                ("user", &self.user),
            ]
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(key, _)| key)
            .collect();
            if !missing.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "postgresql engine requires database.{}",
                        missing.join(", database.")
                    ),
                });
            }
        }
        Ok(())
    }
}

fn default_migrations_dir() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_version_table() -> String {
    "__db_version__".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            dialect: None,
            encoding: FileEncoding::default(),
            utc_timestamp: false,
            force_execute_old_migrations_versions: false,
            force_use_files_on_down: false,
            database: DatabaseConfig::default(),
            environments: HashMap::new(),
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory.
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.iter().all(|d| d.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "At least one migrations_dir entry must be specified".to_string(),
            });
        }
        self.database.validate()?;
        for (name, env) in &self.environments {
            if let Some(database) = &env.database {
                database.validate().map_err(|e| match e {
                    CoreError::ConfigInvalid { message } => CoreError::ConfigInvalid {
                        message: format!("environment '{name}': {message}"),
                    },
                    other => other,
                })?;
            }
            if matches!(&env.migrations_dir, Some(dirs) if dirs.iter().all(|d| d.trim().is_empty()))
            {
                return Err(CoreError::ConfigInvalid {
                    message: format!("environment '{name}': migrations_dir cannot be empty"),
                });
            }
        }
        Ok(())
    }

    /// Get the list of available environment names, sorted
    pub fn available_environments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environments.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Return a copy with the named environment's overrides applied.
    pub fn with_environment(&self, name: Option<&str>) -> CoreResult<Config> {
        let Some(name) = name else {
            return Ok(self.clone());
        };
        let env = self
            .environments
            .get(name)
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!(
                    "Environment '{}' not found. Available environments: {}",
                    name,
                    self.available_environments().join(", ")
                ),
            })?;

        let mut merged = self.clone();
        if let Some(database) = &env.database {
            merged.database = database.clone();
        }
        if let Some(dirs) = &env.migrations_dir {
            merged.migrations_dir = dirs.clone();
        }
        if env.dialect.is_some() {
            merged.dialect = env.dialect;
        }
        Ok(merged)
    }

    /// Resolve environment from CLI flag or TIDEMARK_ENV environment variable
    ///
    /// Priority: CLI flag > TIDEMARK_ENV env var > None
    pub fn resolve_environment(cli_env: Option<&str>) -> Option<String> {
        cli_env
            .map(String::from)
            .or_else(|| std::env::var(ENV_VAR).ok().filter(|v| !v.is_empty()))
    }

    /// Dialect of the migration bodies
    pub fn effective_dialect(&self) -> Dialect {
        self.dialect
            .unwrap_or_else(|| self.database.engine.default_dialect())
    }

    /// Absolute (root-joined) migration directories, blanks dropped
    pub fn migrations_dirs_absolute(&self) -> Vec<PathBuf> {
        self.migrations_dir
            .iter()
            .filter(|d| !d.trim().is_empty())
            .map(|d| self.root.join(d.trim()))
            .collect()
    }

    /// Directory where `tm new` writes files: the first configured one
    pub fn primary_migrations_dir(&self) -> PathBuf {
        self.migrations_dirs_absolute()
            .into_iter()
            .next()
            .unwrap_or_else(|| self.root.join("migrations"))
    }

    /// DuckDB path resolved against the config directory, `:memory:` as-is
    pub fn duckdb_path(&self) -> String {
        let path = self.database.path.as_str();
        if path == ":memory:" || Path::new(path).is_absolute() {
            path.to_string()
        } else {
            self.root.join(path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
