//! SQL dialect selection

use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    ClickHouseDialect, Dialect as ParserDialect, DuckDbDialect, GenericDialect, MsSqlDialect,
    MySqlDialect, PostgreSqlDialect,
};
use sqlparser::parser::Parser;
use std::fmt;
use std::str::FromStr;

use crate::error::{SqlError, SqlResult};

/// SQL dialect of the migration files.
///
/// The dialect decides how migration bodies are split into statements and
/// which sqlparser grammar `tm validate` checks them against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ANSI SQL (default)
    #[default]
    #[serde(alias = "ansi")]
    Generic,
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    #[serde(alias = "postgres")]
    PostgreSql,
    /// Microsoft SQL Server
    MsSql,
    /// Oracle, with `CREATE ... /` procedural object bodies
    Oracle,
    /// ClickHouse, with `CREATE ... /` procedural object bodies
    ClickHouse,
    /// DuckDB
    DuckDb,
}

impl Dialect {
    /// Every supported dialect, in display order.
    pub const ALL: [Dialect; 7] = [
        Dialect::Generic,
        Dialect::MySql,
        Dialect::PostgreSql,
        Dialect::MsSql,
        Dialect::Oracle,
        Dialect::ClickHouse,
        Dialect::DuckDb,
    ];

    /// Whether `CREATE [OR REPLACE] TRIGGER|FUNCTION|PROCEDURE|PACKAGE` bodies
    /// terminated by a bare `/` line are kept as a single statement.
    pub fn has_procedural_blocks(&self) -> bool {
        matches!(self, Dialect::Oracle | Dialect::ClickHouse)
    }

    /// Get the sqlparser dialect used for syntax checks.
    ///
    /// sqlparser has no Oracle grammar, so Oracle falls back to the generic one.
    pub fn parser_dialect(&self) -> Box<dyn ParserDialect> {
        match self {
            Dialect::Generic | Dialect::Oracle => Box::new(GenericDialect {}),
            Dialect::MySql => Box::new(MySqlDialect {}),
            Dialect::PostgreSql => Box::new(PostgreSqlDialect {}),
            Dialect::MsSql => Box::new(MsSqlDialect {}),
            Dialect::ClickHouse => Box::new(ClickHouseDialect {}),
            Dialect::DuckDb => Box::new(DuckDbDialect {}),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let dialect = self.parser_dialect();
        Parser::parse_sql(dialect.as_ref(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }

    /// Get the dialect name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::MsSql => "mssql",
            Dialect::Oracle => "oracle",
            Dialect::ClickHouse => "clickhouse",
            Dialect::DuckDb => "duckdb",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "ansi" => Ok(Dialect::Generic),
            "mysql" => Ok(Dialect::MySql),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSql),
            "mssql" => Ok(Dialect::MsSql),
            "oracle" => Ok(Dialect::Oracle),
            "clickhouse" => Ok(Dialect::ClickHouse),
            "duckdb" => Ok(Dialect::DuckDb),
            _ => Err(SqlError::UnknownDialect(s.to_string())),
        }
    }
}

/// Parse line and column from sqlparser error message.
///
/// sqlparser's `ParserError` is a simple string wrapper with no structured
/// location data, so we extract "Line: N, Column: M" from the error message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
