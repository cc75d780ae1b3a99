use super::*;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.migrations_dir, vec!["migrations"]);
    assert_eq!(config.encoding, FileEncoding::Utf8);
    assert_eq!(config.database.engine, Engine::DuckDb);
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.database.version_table, "__db_version__");
    assert_eq!(config.effective_dialect(), Dialect::DuckDb);
    assert!(!config.utc_timestamp);
    assert!(!config.force_execute_old_migrations_versions);
    assert!(!config.force_use_files_on_down);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
migrations_dir:
  - migrations
  - shared/migrations
dialect: mysql
encoding: latin-1
utc_timestamp: true
force_execute_old_migrations_versions: true
database:
  engine: postgresql
  host: db.internal
  port: 6543
  user: deploy
  name: shop
  version_table: schema_history
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.migrations_dir.len(), 2);
    assert_eq!(config.effective_dialect(), Dialect::MySql);
    assert_eq!(config.encoding, FileEncoding::Latin1);
    assert!(config.utc_timestamp);
    assert_eq!(config.database.engine, Engine::PostgreSql);
    assert_eq!(config.database.port, 6543);
    assert_eq!(config.database.version_table, "schema_history");
}

#[test]
fn test_dialect_follows_engine() {
    let config: Config = serde_yaml::from_str(
        "database:\n  engine: postgres\n  host: h\n  user: u\n  name: n\n",
    )
    .unwrap();
    assert_eq!(config.effective_dialect(), Dialect::PostgreSql);
}

#[test]
fn test_unknown_field_rejected() {
    assert!(serde_yaml::from_str::<Config>("migration_dirs: [a]").is_err());
    assert!(serde_yaml::from_str::<Config>("database:\n  engin: duckdb\n").is_err());
}

#[test]
fn test_empty_migrations_dir_is_invalid() {
    let config: Config = serde_yaml::from_str("migrations_dir: []").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_postgres_requires_connection_fields() {
    let config: Config = serde_yaml::from_str("database:\n  engine: postgresql\n  host: h\n").unwrap();
    let Err(CoreError::ConfigInvalid { message }) = config.validate() else {
        panic!("expected invalid config");
    };
    assert!(message.contains("database.name"), "{message}");
    assert!(message.contains("database.user"), "{message}");
    assert!(!message.contains("database.host"), "{message}");
}

#[test]
fn test_empty_version_table_is_invalid() {
    let config: Config = serde_yaml::from_str("database:\n  version_table: ''\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_environment_overrides() {
    let yaml = r#"
database:
  path: dev.duckdb
environments:
  prod:
    database:
      engine: postgresql
      host: prod-db
      user: deploy
      name: shop
    migrations_dir: [prod_migrations]
  ci:
    dialect: generic
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.available_environments(), vec!["ci", "prod"]);

    let prod = config.with_environment(Some("prod")).unwrap();
    assert_eq!(prod.database.engine, Engine::PostgreSql);
    assert_eq!(prod.migrations_dir, vec!["prod_migrations"]);
    assert_eq!(prod.effective_dialect(), Dialect::PostgreSql);

    let ci = config.with_environment(Some("ci")).unwrap();
    assert_eq!(ci.database.path, "dev.duckdb");
    assert_eq!(ci.effective_dialect(), Dialect::Generic);

    let base = config.with_environment(None).unwrap();
    assert_eq!(base.database.path, "dev.duckdb");
}

#[test]
fn test_unknown_environment_lists_available() {
    let config: Config = serde_yaml::from_str("environments:\n  dev: {}\n").unwrap();
    let Err(CoreError::ConfigInvalid { message }) = config.with_environment(Some("qa")) else {
        panic!("expected unknown environment error");
    };
    assert!(message.contains("'qa'"));
    assert!(message.contains("dev"));
}

#[test]
fn test_resolve_environment_prefers_cli_flag() {
    assert_eq!(
        Config::resolve_environment(Some("staging")),
        Some("staging".to_string())
    );
}

#[test]
fn test_load_from_dir_resolves_paths_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let mut file = std::fs::File::create(dir.path().join("tidemark.yaml")).unwrap();
    writeln!(file, "migrations_dir: [db/migrations]\ndatabase:\n  path: app.duckdb").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.root, dir.path());
    assert_eq!(
        config.migrations_dirs_absolute(),
        vec![dir.path().join("db/migrations")]
    );
    assert_eq!(config.primary_migrations_dir(), dir.path().join("db/migrations"));
    assert_eq!(
        config.duckdb_path(),
        dir.path().join("app.duckdb").display().to_string()
    );
}

#[test]
fn test_memory_path_is_not_joined() {
    let config = Config::default();
    assert_eq!(config.duckdb_path(), ":memory:");
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Config::load_from_dir(dir.path()),
        Err(CoreError::ConfigNotFound { .. })
    ));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tidemark.yml");
    std::fs::write(&path, "migrations_dir: [unclosed").unwrap();
    assert!(matches!(Config::load(&path), Err(CoreError::YamlParse(_))));
}
