//! Database abstraction layer for db-narrate.
//!
//! The data store is an external collaborator behind the `DatabaseClient`
//! trait. The shipped backend is SQLite via sqlx, seeded with a demo dataset.

mod mock;
mod schema;
mod seed;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use schema::{Column, ForeignKey, Schema, Table};
pub use seed::Dataset;
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::DatabaseConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Opens the configured data store.
///
/// The caller owns the returned handle and should `close` it once.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn DatabaseClient>> {
    let client = SqliteClient::connect(config).await?;
    Ok(Arc::new(client))
}

/// Trait defining the interface for data store clients.
///
/// All operations are async and return Results with NarrateError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement and materializes its full result set.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Describes the tables available for querying.
    async fn describe_schema(&self) -> Result<Schema>;

    /// Closes the underlying connection.
    async fn close(&self) -> Result<()>;
}
