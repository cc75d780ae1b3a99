use super::*;
use chrono::NaiveDate;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2009, 2, 12)
        .unwrap()
        .and_hms_opt(11, 21, 4)
        .unwrap()
}

#[test]
fn test_file_name_validation() {
    assert!(is_migration_file_name("20090212112104_add_users.migration"));
    assert!(is_migration_file_name("20090212112104_ADD_users.MIGRATION"));
    assert!(!is_migration_file_name("2009021211210_add_users.migration"));
    assert!(!is_migration_file_name("20090212112104-add_users.migration"));
    assert!(!is_migration_file_name("20090212112104_add users.migration"));
    assert!(!is_migration_file_name("20090212112104_add_users.sql"));
    assert!(!is_migration_file_name("20090212112104_.migration"));
}

#[test]
fn test_parse_file_name() {
    let (version, title) = parse_file_name("20090212112104_add_users.migration").unwrap();
    assert_eq!(version, "20090212112104");
    assert_eq!(title, "add_users");
    assert!(matches!(
        parse_file_name("readme.txt"),
        Err(CoreError::InvalidFilename { .. })
    ));
}

#[test]
fn test_parse_triple_quoted_bodies() {
    let source = r#"#-*- coding: utf-8 -*-
# a comment
SQL_UP = u"""
create table spam (id int);
"""
SQL_DOWN = u"""
drop table spam;
"""
"#;
    let bodies = parse_source(source).unwrap();
    assert_eq!(bodies.sql_up.as_deref(), Some("\ncreate table spam (id int);\n"));
    assert_eq!(bodies.sql_down.as_deref(), Some("\ndrop table spam;\n"));
}

#[test]
fn test_parse_single_quoted_and_escapes() {
    let source = "SQL_UP = 'insert into t values (\\'a\\');\\n'\nSQL_DOWN = \"delete from t\"  # trailing\n";
    let bodies = parse_source(source).unwrap();
    assert_eq!(bodies.sql_up.as_deref(), Some("insert into t values ('a');\n"));
    assert_eq!(bodies.sql_down.as_deref(), Some("delete from t"));
}

#[test]
fn test_raw_literal_keeps_backslashes() {
    let bodies = parse_source("SQL_UP = r'''select '\\n'''\nSQL_DOWN = '''x'''").unwrap();
    assert_eq!(bodies.sql_up.as_deref(), Some("select '\\n"));
}

#[test]
fn test_other_assignments_are_ignored() {
    let bodies = parse_source("AUTHOR = 'someone'\nSQL_UP = 'a'\nSQL_DOWN = 'b'\n").unwrap();
    assert_eq!(bodies.sql_up.as_deref(), Some("a"));
    assert_eq!(bodies.sql_down.as_deref(), Some("b"));
}

#[test]
fn test_unterminated_literal_reports_line() {
    let err = parse_source("\n\nSQL_UP = \"\"\"create table x").unwrap_err();
    assert!(err.starts_with("line 3:"), "{err}");
    assert!(err.contains("unterminated"), "{err}");
}

#[test]
fn test_single_quote_cannot_span_lines() {
    assert!(parse_source("SQL_UP = 'create\ntable'").is_err());
}

#[test]
fn test_garbage_is_rejected() {
    let err = parse_source("SQL_UP 'x'").unwrap_err();
    assert!(err.contains("expected NAME"), "{err}");
    assert!(parse_source("SQL_UP = 'x' extra").is_err());
}

#[test]
fn test_load_migration() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "20090212112104_add_users.migration",
        "SQL_UP = '''create table users (id int);'''\nSQL_DOWN = '''drop table users;'''\n",
    );
    let migration = load(&path, FileEncoding::Utf8).unwrap();
    assert_eq!(migration.version, "20090212112104");
    assert_eq!(migration.title, "add_users");
    assert_eq!(migration.file_name, "20090212112104_add_users.migration");
    assert_eq!(migration.sql_up, "create table users (id int);");
    assert_eq!(migration.sql_down, "drop table users;");
    assert!(migration.abs_path.unwrap().is_absolute());
    assert!(migration.id.is_none());
}

#[test]
fn test_load_rejects_invalid_name_before_existence() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load(&dir.path().join("nope.migration"), FileEncoding::Utf8),
        Err(CoreError::InvalidFilename { .. })
    ));
    assert!(matches!(
        load(&dir.path().join("20090212112104_gone.migration"), FileEncoding::Utf8),
        Err(CoreError::FileNotFound { .. })
    ));
}

#[test]
fn test_load_missing_or_empty_body() {
    let dir = TempDir::new().unwrap();
    let missing = write(dir.path(), "20090212112104_a.migration", "SQL_UP = 'x'\n");
    let Err(CoreError::MalformedMigration { reason, .. }) = load(&missing, FileEncoding::Utf8) else {
        panic!("expected malformed migration");
    };
    assert_eq!(reason, "SQL_DOWN is missing");

    let empty = write(
        dir.path(),
        "20090212112105_b.migration",
        "SQL_UP = '''  \n '''\nSQL_DOWN = 'y'\n",
    );
    let Err(CoreError::MalformedMigration { reason, .. }) = load(&empty, FileEncoding::Utf8) else {
        panic!("expected malformed migration");
    };
    assert_eq!(reason, "SQL_UP is empty");
}

#[test]
fn test_load_latin1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("20090212112104_names.migration");
    let mut bytes = b"SQL_UP = \"insert into t values ('caf".to_vec();
    bytes.push(0xe9);
    bytes.extend_from_slice(b"')\"\nSQL_DOWN = 'delete from t'\n");
    std::fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        load(&path, FileEncoding::Utf8),
        Err(CoreError::MalformedMigration { .. })
    ));
    let migration = load(&path, FileEncoding::Latin1).unwrap();
    assert_eq!(migration.sql_up, "insert into t values ('café')");
}

#[test]
fn test_create_writes_template() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("migrations");
    let path = create_at("add_users", &target, FileEncoding::Utf8, fixed_time()).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "20090212112104_add_users.migration"
    );
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("#-*- coding: utf-8 -*-\n"));
    let bodies = parse_source(&content).unwrap();
    assert!(bodies.sql_up.is_some());
    assert!(bodies.sql_down.is_some());
}

#[test]
fn test_create_rejects_bad_names() {
    let dir = TempDir::new().unwrap();
    for name in ["", "Add_Users", "add-users", "add users"] {
        assert!(
            matches!(
                create_at(name, dir.path(), FileEncoding::Utf8, fixed_time()),
                Err(CoreError::InvalidName { .. })
            ),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn test_create_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    create_at("spam", dir.path(), FileEncoding::Latin1, fixed_time()).unwrap();
    assert!(matches!(
        create_at("spam", dir.path(), FileEncoding::Latin1, fixed_time()),
        Err(CoreError::MigrationExists { .. })
    ));
}

#[test]
fn test_create_with_current_time_is_loadable_name() {
    let dir = TempDir::new().unwrap();
    let path = create("eggs", dir.path(), FileEncoding::Utf8, true).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(is_migration_file_name(name), "{name}");
}
