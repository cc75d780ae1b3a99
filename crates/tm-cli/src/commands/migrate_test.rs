use super::*;
use tm_core::{Direction, Migration, Version};
use tm_run::StepReport;

fn version(text: &str) -> Version {
    text.parse().unwrap()
}

fn migration(id: i64, v: &str, file_name: &str) -> Migration {
    Migration::from_history(
        id,
        version(v),
        None,
        file_name,
        "create table spam (id int);",
        "drop table spam;",
    )
}

fn plain() -> OutputStyle {
    OutputStyle::new(false)
}

#[test]
fn test_plan_header_lists_files() {
    let plan = ExecutionPlan {
        direction: Direction::Up,
        current: version("0"),
        destination: version("20090212112200"),
        label: Some("release_1".parse().unwrap()),
        migrations: vec![
            migration(2, "20090212112104", "20090212112104_create_spam.migration"),
            migration(3, "20090212112200", "20090212112200_create_eggs.migration"),
        ],
    };
    assert_eq!(
        plan_header(&plan, plain()),
        vec![
            "- Current version is: 0",
            "- Destination version is: 20090212112200",
            "- Label is: release_1",
            "Migrating up (2 migration(s))",
            "    20090212112104_create_spam.migration",
            "    20090212112200_create_eggs.migration",
        ]
    );
}

#[test]
fn test_plan_header_for_empty_plan() {
    let plan = ExecutionPlan {
        direction: Direction::Up,
        current: version("20090212112104"),
        destination: version("20090212112104"),
        label: None,
        migrations: Vec::new(),
    };
    assert_eq!(plan_header(&plan, plain()).len(), 2);
}

#[test]
fn test_report_lines_for_executed_run() {
    let report = RunReport {
        direction: Direction::Down,
        from: version("20090212112200"),
        to: version("0"),
        label: None,
        steps: vec![StepReport {
            version: version("20090212112200"),
            file_name: "20090212112200_create_eggs.migration".to_string(),
            direction: Direction::Down,
            statements: vec!["drop table eggs".to_string()],
            executed: true,
        }],
        final_version: version("0"),
    };
    assert_eq!(
        report_lines(&report, plain()),
        vec![
            "===== 20090212112200_create_eggs.migration (down) done =====",
            "drop table eggs;",
            "Done. Schema is at version 0",
        ]
    );
}

#[test]
fn test_report_lines_for_dry_run() {
    let report = RunReport {
        direction: Direction::Up,
        from: version("0"),
        to: version("20090212112104"),
        label: None,
        steps: vec![StepReport {
            version: version("20090212112104"),
            file_name: String::new(),
            direction: Direction::Up,
            statements: vec!["create table spam (id int)".to_string()],
            executed: false,
        }],
        final_version: version("0"),
    };
    let lines = report_lines(&report, plain());
    assert_eq!(
        lines[0],
        "===== 20090212112104 (up) not executed ====="
    );
    assert_eq!(lines[2], "Dry run. 1 migration(s) shown, nothing executed");
}
