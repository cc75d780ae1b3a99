//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tidemark - versioned SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the configuration file (default: ./tidemark.yml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Environment from the configuration's `environments` section
    /// (default: $TIDEMARK_ENV)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Migration directories, colon separated
    #[arg(long, global = true)]
    pub migrations_dir: Option<String>,

    /// SQL dialect of the migration files
    #[arg(long, global = true)]
    pub dialect: Option<String>,

    /// Log verbosity: 0 warnings, 1 progress, 2 statements
    #[arg(long, global = true, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub log_level: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate the database up or down to a version
    Migrate(MigrateArgs),

    /// Show the migrations a run would execute
    Plan(PlanArgs),

    /// Create a new, empty migration file
    New(NewArgs),

    /// Show the applied history of the database
    Status(StatusArgs),

    /// Split and syntax-check every migration on disk
    Validate(ValidateArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Destination version (default: latest on disk)
    #[arg(short = 'm', long)]
    pub version: Option<String>,

    /// Label to migrate to, and to tag applied migrations with
    #[arg(long)]
    pub label: Option<String>,

    /// Ask for confirmation before each migration
    #[arg(long)]
    pub paused: bool,

    /// Drop and recreate the database first
    #[arg(long)]
    pub drop: bool,

    /// Print the statements of each executed migration
    #[arg(long)]
    pub show_sql: bool,

    /// Print the statements without executing them
    #[arg(long, conflicts_with = "paused")]
    pub show_sql_only: bool,

    /// Run unapplied older migrations even when already at the destination
    #[arg(long)]
    pub force_old_migrations: bool,

    /// Take down SQL from the migration files instead of the history
    #[arg(long)]
    pub force_files_on_down: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Destination version (default: latest on disk)
    #[arg(short = 'm', long)]
    pub version: Option<String>,

    /// Label to resolve against the history
    #[arg(long)]
    pub label: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: PlanOutput,
}

/// Plan output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Migration name: lowercase letters, digits and underscores
    pub name: String,

    /// Stamp the file with UTC instead of local time
    #[arg(long)]
    pub utc_timestamp: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Look up the history id of this version
    #[arg(short = 'm', long)]
    pub version: Option<String>,

    /// Look up the version applied under this label
    #[arg(long)]
    pub label: Option<String>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
