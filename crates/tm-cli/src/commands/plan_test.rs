use super::*;
use tm_core::{Direction, Migration, Version};

fn version(text: &str) -> Version {
    text.parse().unwrap()
}

#[test]
fn test_plan_rows_are_numbered_in_execution_order() {
    let plan = ExecutionPlan {
        direction: Direction::Down,
        current: version("20090212112200"),
        destination: version("0"),
        label: None,
        migrations: vec![
            Migration::from_history(
                3,
                version("20090212112200"),
                None,
                "20090212112200_create_eggs.migration",
                "create table eggs (id int);",
                "drop table eggs;",
            ),
            Migration::from_history(
                2,
                version("20090212112104"),
                None,
                "20090212112104_create_spam.migration",
                "create table spam (id int);",
                "drop table spam;",
            ),
        ],
    };
    assert_eq!(
        plan_rows(&plan),
        vec![
            vec![
                "1".to_string(),
                "20090212112200".to_string(),
                "down".to_string(),
                "20090212112200_create_eggs.migration".to_string(),
            ],
            vec![
                "2".to_string(),
                "20090212112104".to_string(),
                "down".to_string(),
                "20090212112104_create_spam.migration".to_string(),
            ],
        ]
    );
}

#[test]
fn test_plan_serializes_direction_and_versions() {
    let plan = ExecutionPlan {
        direction: Direction::Up,
        current: version("0"),
        destination: version("20090212112104"),
        label: None,
        migrations: Vec::new(),
    };
    let json: serde_json::Value = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["direction"], "up");
    assert_eq!(json["current"], "0");
    assert_eq!(json["destination"], "20090212112104");
    assert!(json.get("label").is_none());
}
