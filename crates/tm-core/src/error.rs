//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: IO error
    #[error("[E003] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E005: YAML parse error
    #[error("[E005] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// M001: Configured migrations directory does not exist
    #[error("[M001] Migrations directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// M002: Scan found no migration files at all
    #[error("[M002] No migration files found in: {dirs}")]
    NoMigrationsFound { dirs: String },

    /// M003: File name does not match `YYYYMMDDHHMMSS_title.migration`
    #[error("[M003] Invalid migration file name '{name}': expected YYYYMMDDHHMMSS_title.migration")]
    InvalidFilename { name: String },

    /// M004: Migration file missing
    #[error("[M004] Migration file not found: {path}")]
    FileNotFound { path: String },

    /// M005: SQL_UP / SQL_DOWN missing, empty, or unparseable
    #[error("[M005] Malformed migration '{path}': {reason}")]
    MalformedMigration { path: String, reason: String },

    /// M006: New migration name has characters outside [a-z0-9_]
    #[error("[M006] Invalid migration name '{name}': only lowercase letters, digits and '_' are allowed")]
    InvalidName { name: String },

    /// M007: A new migration would overwrite an existing file
    #[error("[M007] Migration file already exists: {path}")]
    MigrationExists { path: String },

    /// P001: Requested version has no migration file
    #[error("[P001] Version not found ({version})")]
    VersionNotFound { version: String },

    /// P002: Only one of label / version exists in the history
    #[error("[P002] Label ({label}) or schema_version ({version}), only one of them exists in the database")]
    LabelVersionMismatch { label: String, version: String },

    /// P003: Label and version resolve to different history rows
    #[error("[P003] Label ({label}) and schema_version ({version}) don't correspond to the same version at database")]
    LabelVersionConflict { label: String, version: String },

    /// P004: Going down to a version that was never applied
    #[error("[P004] Cannot migrate down from {current} to {destination}: version {destination} was never applied")]
    CannotMigrateToUnknownLowerVersion {
        current: String,
        destination: String,
    },

    /// P005: Stored down SQL is empty and no file provides it
    #[error("[P005] Impossible to migrate down: no migration file found for version {version}")]
    ImpossibleDownMigration { version: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
