//! SQLite database client implementation.
//!
//! Uses sqlx with a single-connection pool. One connection keeps an
//! in-memory database alive for the whole session and serializes access
//! from concurrent callers.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Executor as _, Row as _, TypeInfo as _, ValueRef as _};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::seed::Dataset;
use super::{Column, ColumnInfo, DatabaseClient, ForeignKey, QueryResult, Row, Schema, Table, Value};
use crate::config::DatabaseConfig;
use crate::error::{NarrateError, Result};

/// Query execution timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// SQLite client backed by sqlx.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens the database at `url` (any sqlx SQLite URL, e.g. `sqlite::memory:`).
    pub async fn open(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| NarrateError::connection(format!("Invalid database URL '{url}': {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| NarrateError::connection(format!("Failed to open '{url}': {e}")))?;

        debug!("Opened SQLite database at {url}");
        Ok(Self { pool })
    }

    /// Opens the configured database and loads the configured dataset and
    /// seed file.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let client = Self::open(&config.url).await?;
        client.load_dataset(config.dataset).await?;

        if let Some(path) = &config.seed {
            let script = std::fs::read_to_string(path).map_err(|e| {
                NarrateError::connection(format!(
                    "Failed to read seed file {}: {e}",
                    path.display()
                ))
            })?;
            client.run_script(&script).await?;
            info!("Applied seed file {}", path.display());
        }

        Ok(client)
    }

    /// Creates and fills the tables of a built-in dataset.
    pub async fn load_dataset(&self, dataset: Dataset) -> Result<()> {
        for statement in dataset.statements() {
            self.execute_statement(statement).await?;
        }
        if dataset != Dataset::None {
            info!("Loaded dataset '{dataset}'");
        }
        Ok(())
    }

    /// Executes a multi-statement script, comments included, in order.
    pub async fn run_script(&self, script: &str) -> Result<()> {
        sqlx::raw_sql(script)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                NarrateError::connection(format!("Seeding failed: {}", query_error_message(&e)))
            })?;
        Ok(())
    }

    async fn execute_statement(&self, statement: &str) -> Result<()> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                NarrateError::connection(format!("Seeding failed: {}", query_error_message(&e)))
            })?;
        Ok(())
    }

    /// Column metadata for a statement that returned no rows.
    async fn describe_columns(&self, sql: &str) -> Result<Vec<ColumnInfo>> {
        let described = (&self.pool)
            .describe(sql)
            .await
            .map_err(|e| NarrateError::query(query_error_message(&e)))?;

        Ok(described
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect())
    }

    async fn fetch_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NarrateError::query(query_error_message(&e)))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("name")
                    .map_err(|e| NarrateError::internal(e.to_string()))
            })
            .collect()
    }

    async fn fetch_table(&self, name: &str) -> Result<Table> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_identifier(name)))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| NarrateError::query(query_error_message(&e)))?;

        let mut table = Table::new(name);
        for row in &rows {
            let column_name: String = row.try_get("name").unwrap_or_default();
            let data_type: String = row.try_get("type").unwrap_or_default();
            let not_null: i64 = row.try_get("notnull").unwrap_or(0);
            let pk: i64 = row.try_get("pk").unwrap_or(0);

            if pk > 0 {
                table.primary_key.push(column_name.clone());
            }
            table
                .columns
                .push(Column::new(column_name, data_type).nullable(not_null == 0 && pk == 0));
        }

        Ok(table)
    }

    async fn fetch_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let rows = sqlx::query(&format!(
            "PRAGMA foreign_key_list({})",
            quote_identifier(table)
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NarrateError::query(query_error_message(&e)))?;

        Ok(rows
            .iter()
            .map(|row| {
                let to_table: String = row.try_get("table").unwrap_or_default();
                let from: String = row.try_get("from").unwrap_or_default();
                // NULL when the reference targets the primary key implicitly
                let to: Option<String> = row.try_get("to").unwrap_or(None);
                ForeignKey::new(table, from, to_table, to.unwrap_or_else(|| "id".to_string()))
            })
            .collect())
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            sqlx::query(sql).fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            NarrateError::query(format!(
                "Query timed out after {QUERY_TIMEOUT_SECS} seconds"
            ))
        })?
        .map_err(|e| NarrateError::query(query_error_message(&e)))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = match result.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            None => self.describe_columns(sql).await.unwrap_or_default(),
        };

        let rows: Vec<Row> = result.iter().map(convert_row).collect();

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn describe_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();

        for name in self.fetch_tables().await? {
            schema.foreign_keys.extend(self.fetch_foreign_keys(&name).await?);
            schema.tables.push(self.fetch_table(&name).await?);
        }

        Ok(schema)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a row into values, using each value's storage class.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.len()).map(|i| convert_value(row, i)).collect()
}

fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }
    let type_name = raw.type_info().name().to_uppercase();

    match type_name.as_str() {
        "INTEGER" | "INT8" | "BIGINT" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),
        "BOOLEAN" => row
            .try_get_unchecked::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "REAL" | "DOUBLE" | "FLOAT" | "NUMERIC" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),
        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Returns the store's diagnostic for a failed statement.
///
/// Database errors carry SQLite's own message (`no such table: foo`) with
/// no prefix, so it can be shown to the user verbatim.
fn query_error_message(error: &sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
