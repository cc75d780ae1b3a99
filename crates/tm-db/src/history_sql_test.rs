use super::*;

fn duckdb_sql() -> HistorySql {
    HistorySql::new("__db_version__", Placeholder::Question, IdStrategy::Sequence).unwrap()
}

fn postgres_sql() -> HistorySql {
    HistorySql::new("public.schema_history", Placeholder::Dollar, IdStrategy::Serial).unwrap()
}

#[test]
fn test_placeholders_per_engine() {
    assert_eq!(
        duckdb_sql().insert_migration(),
        "INSERT INTO \"__db_version__\" (version, label, name, sql_up, sql_down) VALUES (?, ?, ?, ?, ?)"
    );
    assert_eq!(
        postgres_sql().insert_migration(),
        "INSERT INTO \"public\".\"schema_history\" (version, label, name, sql_up, sql_down) VALUES ($1, $2, $3, $4, $5)"
    );
    assert_eq!(
        postgres_sql().delete_version(),
        "DELETE FROM \"public\".\"schema_history\" WHERE version = $1"
    );
}

#[test]
fn test_create_table_uses_sequence_for_duckdb() {
    let ddl = duckdb_sql().create_table();
    assert!(ddl.starts_with("CREATE SEQUENCE IF NOT EXISTS \"__db_version___id_seq\";"));
    assert!(ddl.contains("DEFAULT nextval('__db_version___id_seq')"));
    assert!(ddl.contains("version VARCHAR(20) NOT NULL DEFAULT '0'"));
    assert!(ddl.trim_end().ends_with("sql_down TEXT\n)"));
}

#[test]
fn test_create_table_uses_bigserial_for_postgres() {
    let ddl = postgres_sql().create_table();
    assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"public\".\"schema_history\""));
    assert!(ddl.contains("id BIGSERIAL PRIMARY KEY"));
    assert!(!ddl.contains("SEQUENCE"));
}

#[test]
fn test_table_name_is_unqualified() {
    assert_eq!(postgres_sql().table_name(), "schema_history");
    assert_eq!(duckdb_sql().table_name(), "__db_version__");
}

#[test]
fn test_invalid_table_names() {
    for name in ["", "a.b.c", "1table", "drop table x", "x;y", "a."] {
        assert!(
            matches!(
                HistorySql::new(name, Placeholder::Question, IdStrategy::Sequence),
                Err(DbError::InvalidTableName(_))
            ),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn test_lookup_queries_order_by_id() {
    let sql = duckdb_sql();
    assert!(sql.current_version().ends_with("ORDER BY id DESC LIMIT 1"));
    assert!(sql.version_for_label().contains("WHERE label = ? ORDER BY id DESC"));
    assert!(sql.id_for_version().starts_with("SELECT MAX(id)"));
    assert!(sql.all_migrations().ends_with("ORDER BY id"));
}

#[test]
fn test_quote_ident_escapes_quotes() {
    assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    assert_eq!(
        duckdb_sql().add_column("sql_up", "TEXT"),
        "ALTER TABLE \"__db_version__\" ADD COLUMN \"sql_up\" TEXT"
    );
}
