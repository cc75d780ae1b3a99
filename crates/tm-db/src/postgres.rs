//! PostgreSQL schema store
//!
//! Every operation opens its own connection and drops it when done, so no
//! session (or lock) outlives a single call.

use crate::error::{pg_message, DbError, DbResult};
use crate::history_sql::{
    parse_version, quote_ident, HistoryRow, HistorySql, IdStrategy, Placeholder, UPGRADE_COLUMNS,
};
use crate::traits::{SchemaChange, SchemaStore};
use async_trait::async_trait;
use tm_core::{DatabaseConfig, Direction, Label, Migration, Version};
use tokio_postgres::{Client, NoTls};

/// Database used for CREATE / DROP DATABASE
const MAINTENANCE_DB: &str = "postgres";

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
}

impl PgSettings {
    /// Settings from the `database` config section
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let required = |value: &Option<String>, key: &str| {
            value
                .clone()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DbError::ConnectionError(format!("database.{key} is not set")))
        };
        Ok(Self {
            host: required(&config.host, "host")?,
            port: config.port,
            user: required(&config.user, "user")?,
            password: config.password.clone(),
            dbname: required(&config.name, "name")?,
        })
    }

    fn connect_config(&self, dbname: &str) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(dbname)
            .application_name("tidemark");
        if let Some(password) = &self.password {
            config.password(password);
        }
        config
    }
}

/// PostgreSQL-backed history store
pub struct PostgresStore {
    settings: PgSettings,
    sql: HistorySql,
}

impl PostgresStore {
    pub fn new(settings: PgSettings, version_table: &str) -> DbResult<Self> {
        let sql = HistorySql::new(version_table, Placeholder::Dollar, IdStrategy::Serial)?;
        Ok(Self { settings, sql })
    }

    pub fn settings(&self) -> &PgSettings {
        &self.settings
    }

    async fn connect_to(&self, dbname: &str) -> DbResult<Client> {
        let (client, connection) = self
            .settings
            .connect_config(dbname)
            .connect(NoTls)
            .await
            .map_err(|e| {
                DbError::ConnectionError(format!(
                    "{}@{}:{}/{}: {e}",
                    self.settings.user, self.settings.host, self.settings.port, dbname
                ))
            })?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error: {e}");
            }
        });
        Ok(client)
    }

    async fn connect(&self) -> DbResult<Client> {
        self.connect_to(&self.settings.dbname).await
    }

    async fn database_exists(&self, client: &Client) -> DbResult<bool> {
        let rows = client
            .query(
                "SELECT 1 FROM pg_database WHERE datname = $1",
                &[&self.settings.dbname],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn query_versions(&self, sql: &str) -> DbResult<Vec<Version>> {
        let client = self.connect().await?;
        let rows = client.query(sql, &[]).await?;
        rows.into_iter()
            .map(|row| parse_version(row.try_get(0)?))
            .collect()
    }
}

#[async_trait]
impl SchemaStore for PostgresStore {
    fn engine(&self) -> &'static str {
        "postgresql"
    }

    fn version_table(&self) -> &str {
        self.sql.table_name()
    }

    async fn create_database_if_not_exists(&self) -> DbResult<()> {
        let client = self.connect_to(MAINTENANCE_DB).await?;
        if !self.database_exists(&client).await? {
            log::info!("Creating database {}", self.settings.dbname);
            client
                .batch_execute(&format!(
                    "CREATE DATABASE {}",
                    quote_ident(&self.settings.dbname)
                ))
                .await?;
        }
        Ok(())
    }

    async fn drop_database_if_exists(&self) -> DbResult<()> {
        let client = self.connect_to(MAINTENANCE_DB).await?;
        log::info!("Dropping database {}", self.settings.dbname);
        client
            .batch_execute(&format!(
                "DROP DATABASE IF EXISTS {}",
                quote_ident(&self.settings.dbname)
            ))
            .await?;
        Ok(())
    }

    async fn create_version_table_if_not_exists(&self) -> DbResult<()> {
        let client = self.connect().await?;
        client.batch_execute(&self.sql.create_table()).await?;

        let columns: Vec<String> = client
            .query(&self.sql.existing_columns(), &[&self.sql.table_name()])
            .await?
            .into_iter()
            .map(|row| row.try_get(0))
            .collect::<Result<_, _>>()?;
        for (column, ddl_type) in UPGRADE_COLUMNS {
            if !columns.iter().any(|c| c == column) {
                log::info!(
                    "Adding missing column {column} to {}",
                    self.sql.table_name()
                );
                client
                    .batch_execute(&self.sql.add_column(column, ddl_type))
                    .await?;
            }
        }

        let rows: i64 = client.query_one(&self.sql.count_rows(), &[]).await?.try_get(0)?;
        if rows == 0 {
            client.batch_execute(&self.sql.insert_bootstrap()).await?;
        }
        Ok(())
    }

    async fn change(&self, change: &SchemaChange<'_>) -> DbResult<()> {
        let mut client = self.connect().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        for statement in change.statements {
            log::debug!("Executing: {statement}");
            tx.batch_execute(statement)
                .await
                .map_err(|e| DbError::StatementFailed {
                    statement: statement.clone(),
                    message: pg_message(&e),
                })?;
        }

        let version = change.version.as_str();
        match change.direction {
            Direction::Up => {
                let label = change.label.map(Label::as_str);
                tx.execute(
                    &self.sql.insert_migration(),
                    &[
                        &version,
                        &label,
                        &change.file_name,
                        &change.sql_up,
                        &change.sql_down,
                    ],
                )
                .await?;
            }
            Direction::Down => {
                tx.execute(&self.sql.delete_version(), &[&version]).await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    async fn current_schema_version(&self) -> DbResult<Version> {
        let versions = self.query_versions(&self.sql.current_version()).await?;
        Ok(versions.into_iter().next().unwrap_or_else(Version::zero))
    }

    async fn all_schema_versions(&self) -> DbResult<Vec<Version>> {
        self.query_versions(&self.sql.all_versions()).await
    }

    async fn all_schema_migrations(&self) -> DbResult<Vec<Migration>> {
        let client = self.connect().await?;
        let rows = client.query(&self.sql.all_migrations(), &[]).await?;
        rows.into_iter()
            .map(|row| {
                HistoryRow {
                    id: row.try_get(0)?,
                    version: row.try_get(1)?,
                    label: row.try_get(2)?,
                    name: row.try_get(3)?,
                    sql_up: row.try_get(4)?,
                    sql_down: row.try_get(5)?,
                }
                .into_migration()
            })
            .collect()
    }

    async fn version_id_for_version_number(&self, version: &str) -> DbResult<Option<i64>> {
        let client = self.connect().await?;
        let row = client
            .query_one(&self.sql.id_for_version(), &[&version])
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn version_number_for_label(&self, label: &str) -> DbResult<Option<Version>> {
        let client = self.connect().await?;
        let row = client
            .query_opt(&self.sql.version_for_label(), &[&label])
            .await?;
        row.map(|row| parse_version(row.try_get(0)?)).transpose()
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
