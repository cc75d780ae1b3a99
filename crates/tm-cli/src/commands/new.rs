//! New command implementation

use anyhow::{Context, Result};
use tm_core::migration_file;

use crate::cli::{GlobalArgs, NewArgs};
use crate::context::load_config;
use crate::output::OutputStyle;

/// Execute the new command
pub(crate) async fn execute(
    args: &NewArgs,
    global: &GlobalArgs,
    style: OutputStyle,
) -> Result<()> {
    let config = load_config(global)?;
    let dir = config.primary_migrations_dir();
    let path = migration_file::create(
        &args.name,
        &dir,
        config.encoding,
        args.utc_timestamp || config.utc_timestamp,
    )
    .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    println!("{} {}", style.success("Created"), path.display());
    Ok(())
}
