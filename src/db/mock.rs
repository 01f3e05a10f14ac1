//! Mock database clients for testing.
//!
//! `MockDatabaseClient` answers from canned results keyed by exact SQL text;
//! `FailingDatabaseClient` rejects every statement with a fixed message.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DatabaseClient, QueryResult, Schema};
use crate::error::{NarrateError, Result};

/// A mock database client that returns predefined results.
///
/// Statements without a canned result fail with `no such table`, which is
/// what SQLite says for most unknown queries.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    results: HashMap<String, QueryResult>,
    schema: Schema,
    calls: AtomicUsize,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with no canned results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the result returned for `sql`.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.results.insert(sql.into(), result);
        self
    }

    /// Sets the schema returned by `describe_schema`.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Number of `execute_query` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.results.get(sql).cloned().ok_or_else(|| {
            let table = sql.split_whitespace().last().unwrap_or("statement");
            NarrateError::query(format!("no such table: {table}"))
        })
    }

    async fn describe_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every query fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(NarrateError::query(self.message.clone()))
    }

    async fn describe_schema(&self) -> Result<Schema> {
        Err(NarrateError::connection(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
