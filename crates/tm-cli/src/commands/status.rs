//! Status command implementation

use anyhow::{Context, Result};
use tm_core::{MigrationCatalog, SchemaHistory};

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;
use crate::output::OutputStyle;

/// Execute the status command
pub(crate) async fn execute(
    args: &StatusArgs,
    global: &GlobalArgs,
    style: OutputStyle,
) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let store = ctx.store.as_ref();
    store
        .create_database_if_not_exists()
        .await
        .context("Failed to create the database")?;
    store
        .create_version_table_if_not_exists()
        .await
        .context("Failed to prepare the version table")?;

    let current = store.current_schema_version().await?;
    let history = store.history().await?;

    println!(
        "{} {} ({} table {})",
        style.heading("Current version:"),
        style.version(current.as_str()),
        store.engine(),
        store.version_table()
    );
    print_table(&["ID", "VERSION", "LABEL", "NAME"], &history_rows(&history));

    let pending = pending_files(&ctx.catalog, &history);
    if pending.is_empty() {
        println!("{}", style.success("No pending migrations."));
    } else {
        println!(
            "{}",
            style.warning(&format!("{} pending migration(s):", pending.len()))
        );
        for file_name in pending {
            println!("    {file_name}");
        }
    }

    if let Some(version) = &args.version {
        match store.version_id_for_version_number(version).await? {
            Some(id) => println!("Version {} is history id {}", version, id),
            None => println!("{}", style.warning(&format!("Version {version} is not applied"))),
        }
    }
    if let Some(label) = &args.label {
        match store.version_number_for_label(label).await? {
            Some(version) => println!(
                "Label {} is version {}",
                label,
                style.version(version.as_str())
            ),
            None => println!("{}", style.warning(&format!("Label {label} is not applied"))),
        }
    }
    Ok(())
}

fn history_rows(history: &SchemaHistory) -> Vec<Vec<String>> {
    history
        .entries()
        .iter()
        .map(|m| {
            vec![
                m.id.map(|id| id.to_string()).unwrap_or_default(),
                m.version.to_string(),
                m.label.as_ref().map(|l| l.to_string()).unwrap_or_default(),
                m.file_name.clone(),
            ]
        })
        .collect()
}

/// Files on disk whose version is not in the history, ascending.
fn pending_files<'a>(catalog: &'a MigrationCatalog, history: &SchemaHistory) -> Vec<&'a str> {
    catalog
        .migrations()
        .iter()
        .filter(|m| !history.contains(&m.version))
        .map(|m| m.file_name.as_str())
        .collect()
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
