//! Query execution against the data store.
//!
//! Execution never fails from the caller's point of view: a rejected
//! statement becomes `ExecutionOutcome::Failed` carrying the store's own
//! message so it can be shown to the user unchanged.

use std::time::Instant;

use tracing::{debug, warn};

use crate::db::{DatabaseClient, QueryResult};
use crate::explain::SanitizedSql;

/// Outcome of running one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The statement ran; the result may have zero rows.
    Rows(QueryResult),
    /// The store rejected the statement. Holds its diagnostic verbatim.
    Failed(String),
}

impl ExecutionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn rows(&self) -> Option<&QueryResult> {
        match self {
            Self::Rows(result) => Some(result),
            Self::Failed(_) => None,
        }
    }
}

/// Runs `sql` once against `db` and captures the outcome.
pub async fn execute(db: &dyn DatabaseClient, sql: &SanitizedSql) -> ExecutionOutcome {
    let start = Instant::now();
    let result = db.execute_query(sql.as_str()).await;
    let elapsed = start.elapsed();

    match result {
        Ok(result) => {
            debug!(
                rows = result.row_count(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Query succeeded"
            );
            ExecutionOutcome::Rows(result.with_execution_time(elapsed))
        }
        Err(e) => {
            warn!(category = e.category(), "Query failed: {}", e.message());
            ExecutionOutcome::Failed(e.message().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, FailingDatabaseClient, MockDatabaseClient, Value};
    use crate::explain::sanitize;

    #[tokio::test]
    async fn test_execute_success() {
        let canned = QueryResult::with_data(
            vec![ColumnInfo::new("n", "INTEGER")],
            vec![vec![Value::Int(1)]],
        );
        let db = MockDatabaseClient::new().with_result("SELECT 1 AS n", canned);

        let outcome = execute(&db, &sanitize("```sql SELECT 1 AS n```")).await;

        let rows = outcome.rows().expect("Expected rows");
        assert_eq!(rows.row_count(), 1);
        assert_eq!(rows.rows[0][0], Value::Int(1));
        assert_eq!(db.call_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_failure_keeps_message() {
        let db = FailingDatabaseClient::new("near \"SELEC\": syntax error");

        let outcome = execute(&db, &sanitize("SELEC 1")).await;

        assert_eq!(
            outcome,
            ExecutionOutcome::Failed("near \"SELEC\": syntax error".to_string())
        );
        assert!(outcome.is_failed());
        assert!(outcome.rows().is_none());
    }

    #[tokio::test]
    async fn test_empty_result_is_not_failure() {
        let db = MockDatabaseClient::new().with_result(
            "SELECT name FROM staff WHERE 1 = 0",
            QueryResult::with_data(vec![ColumnInfo::new("name", "TEXT")], vec![]),
        );

        let outcome = execute(&db, &sanitize("SELECT name FROM staff WHERE 1 = 0")).await;

        assert!(!outcome.is_failed());
        assert!(outcome.rows().is_some_and(QueryResult::is_empty));
    }
}
