//! Migrate command implementation

use anyhow::{Context, Result};
use tm_core::ExecutionPlan;
use tm_run::{RunOptions, RunReport, Runner};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::plan_request;
use crate::context::RuntimeContext;
use crate::output::OutputStyle;

/// Execute the migrate command
pub(crate) async fn execute(
    args: &MigrateArgs,
    global: &GlobalArgs,
    style: OutputStyle,
) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let drop_database_first = if args.drop && args.show_sql_only {
        println!(
            "{}",
            style.warning("--drop is ignored together with --show-sql-only")
        );
        false
    } else {
        args.drop
    };
    let options = RunOptions {
        dialect: ctx.config.effective_dialect(),
        paused: args.paused,
        show_sql: args.show_sql,
        show_sql_only: args.show_sql_only,
        drop_database_first,
    };

    println!(
        "{} {} ({} dialect)",
        style.heading("Starting migration on"),
        ctx.store.engine(),
        options.dialect
    );

    let runner = Runner::new(ctx.store.as_ref(), &ctx.catalog, options);
    runner
        .prepare()
        .await
        .context("Failed to prepare the version table")?;

    let request = plan_request(
        &ctx.config,
        args.version.as_deref(),
        args.label.as_deref(),
        args.force_old_migrations,
        args.force_files_on_down,
    );
    let plan = runner
        .plan(request)
        .await
        .context("Failed to plan migrations")?;

    for line in plan_header(&plan, style) {
        println!("{line}");
    }
    if plan.is_empty() {
        println!("{}", style.success("Nothing to do."));
        return Ok(());
    }

    let report = runner.execute(&plan).await.context("Migration failed")?;
    for line in report_lines(&report, style) {
        println!("{line}");
    }
    Ok(())
}

/// Current and destination versions, and the label when one was given.
pub(crate) fn version_lines(plan: &ExecutionPlan, style: OutputStyle) -> Vec<String> {
    let mut lines = vec![
        format!("- Current version is: {}", style.version(plan.current.as_str())),
        format!(
            "- Destination version is: {}",
            style.version(plan.destination.as_str())
        ),
    ];
    if let Some(label) = &plan.label {
        lines.push(format!("- Label is: {label}"));
    }
    lines
}

/// [`version_lines`] followed by the files about to run.
fn plan_header(plan: &ExecutionPlan, style: OutputStyle) -> Vec<String> {
    let mut lines = version_lines(plan, style);
    if plan.is_empty() {
        return lines;
    }
    lines.push(format!(
        "{} ({} migration(s))",
        style.heading(&format!("Migrating {}", plan.direction)),
        plan.len()
    ));
    lines.extend(plan.migrations.iter().map(|m| format!("    {m}")));
    lines
}

/// One line per step, with its statements when they were kept.
pub(crate) fn report_lines(report: &RunReport, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for step in &report.steps {
        let marker = if step.executed {
            style.success("done")
        } else {
            style.warning("not executed")
        };
        let name = if step.file_name.is_empty() {
            step.version.as_str()
        } else {
            step.file_name.as_str()
        };
        lines.push(format!("===== {} ({}) {} =====", name, step.direction, marker));
        lines.extend(
            step.statements
                .iter()
                .map(|statement| style.sql(&format!("{statement};"))),
        );
    }

    if report.executed_count() == report.steps.len() {
        lines.push(format!(
            "{} Schema is at version {}",
            style.success("Done."),
            style.version(report.final_version.as_str())
        ));
    } else {
        lines.push(format!(
            "{} {} migration(s) shown, nothing executed",
            style.warning("Dry run."),
            report.steps.len()
        ));
    }
    lines
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
