//! Plan command implementation

use anyhow::{Context, Result};
use tm_core::ExecutionPlan;
use tm_run::{RunOptions, Runner};

use crate::cli::{GlobalArgs, PlanArgs, PlanOutput};
use crate::commands::common::{plan_request, print_table};
use crate::commands::migrate::version_lines;
use crate::context::RuntimeContext;
use crate::output::OutputStyle;

/// Execute the plan command.
///
/// The version table is created if missing so the history can be read;
/// no migration is run.
pub(crate) async fn execute(
    args: &PlanArgs,
    global: &GlobalArgs,
    style: OutputStyle,
) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let options = RunOptions {
        dialect: ctx.config.effective_dialect(),
        ..RunOptions::default()
    };
    let runner = Runner::new(ctx.store.as_ref(), &ctx.catalog, options);
    runner
        .prepare()
        .await
        .context("Failed to prepare the version table")?;

    let request = plan_request(
        &ctx.config,
        args.version.as_deref(),
        args.label.as_deref(),
        false,
        false,
    );
    let plan = runner
        .plan(request)
        .await
        .context("Failed to plan migrations")?;

    match args.output {
        PlanOutput::Json => {
            let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
            println!("{json}");
        }
        PlanOutput::Table => {
            for line in version_lines(&plan, style) {
                println!("{line}");
            }
            if plan.is_empty() {
                println!("{}", style.success("Nothing to do."));
            } else {
                print_table(&["#", "VERSION", "DIRECTION", "FILE"], &plan_rows(&plan));
            }
        }
    }
    Ok(())
}

fn plan_rows(plan: &ExecutionPlan) -> Vec<Vec<String>> {
    plan.migrations
        .iter()
        .enumerate()
        .map(|(i, m)| {
            vec![
                (i + 1).to_string(),
                m.version.to_string(),
                plan.direction.to_string(),
                m.file_name.clone(),
            ]
        })
        .collect()
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
