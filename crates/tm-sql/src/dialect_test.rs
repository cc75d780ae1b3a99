use super::*;

#[test]
fn test_generic_parse() {
    let stmts = Dialect::Generic.parse("SELECT * FROM users").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_mysql_parse_backticks() {
    let stmts = Dialect::MySql
        .parse("CREATE TABLE `spam` (`id` INT NOT NULL)")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_procedural_blocks_only_for_oracle_and_clickhouse() {
    let procedural: Vec<Dialect> = Dialect::ALL
        .into_iter()
        .filter(|d| d.has_procedural_blocks())
        .collect();
    assert_eq!(procedural, vec![Dialect::Oracle, Dialect::ClickHouse]);
}

#[test]
fn test_from_str_round_trips_names() {
    for dialect in Dialect::ALL {
        assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
    }
    assert_eq!("Postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
    assert_eq!("ANSI".parse::<Dialect>().unwrap(), Dialect::Generic);
    assert!(matches!(
        "sybase".parse::<Dialect>(),
        Err(SqlError::UnknownDialect(name)) if name == "sybase"
    ));
}

#[test]
fn test_deserialize_lowercase_and_aliases() {
    let dialect: Dialect = serde_yaml::from_str("mssql").unwrap();
    assert_eq!(dialect, Dialect::MsSql);
    let dialect: Dialect = serde_yaml::from_str("postgres").unwrap();
    assert_eq!(dialect, Dialect::PostgreSql);
    assert!(serde_yaml::from_str::<Dialect>("informix").is_err());
}

#[test]
fn test_parse_error_location() {
    let result = Dialect::Generic.parse("SELECT *\nFROM users WHERE )");
    let Err(SqlError::ParseError {
        line,
        column,
        message,
    }) = result
    else {
        panic!("expected a parse error");
    };
    assert_eq!(
        line, 2,
        "Expected line 2, got line {} (message: {})",
        line, message
    );
    assert!(column > 0, "Expected non-zero column (message: {})", message);
}

#[test]
fn test_parse_location_extraction() {
    let (line, col) =
        super::parse_location_from_error("Expected: something at Line: 5, Column: 10");
    assert_eq!(line, 5);
    assert_eq!(col, 10);

    let (line, col) = super::parse_location_from_error("Some error without location");
    assert_eq!(line, 0);
    assert_eq!(col, 0);
}
