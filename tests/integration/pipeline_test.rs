//! End-to-end pipeline tests against the in-memory demo datasets.

use std::sync::Arc;

use db_narrate::config::DatabaseConfig;
use db_narrate::db::{self, DatabaseClient, Dataset};
use db_narrate::explain::{extract, sanitize, ClauseKind, Language};
use db_narrate::format::ResultBlock;
use db_narrate::query::Pipeline;
use pretty_assertions::assert_eq;

async fn store(dataset: Dataset) -> Arc<dyn DatabaseClient> {
    let config = DatabaseConfig {
        dataset,
        ..DatabaseConfig::default()
    };
    db::connect(&config).await.unwrap()
}

async fn pipeline(dataset: Dataset, language: Language) -> Pipeline {
    Pipeline::with_defaults(store(dataset).await, language)
}

#[tokio::test]
async fn test_filtered_ordered_limited_query() {
    let pipeline = pipeline(Dataset::Staff, Language::En).await;

    let output = pipeline
        .run("SELECT name, salary FROM employees WHERE department = 'IT' ORDER BY salary DESC LIMIT 3")
        .await;

    let explanation = output.explanation.as_str();
    assert!(explanation.contains("employees"));
    assert!(explanation.contains("department = 'it'"));
    assert!(explanation.contains("salary desc"));
    assert!(explanation.contains("limited to the first 3 rows"));

    let ResultBlock::Table { narrative, grid } = &output.result else {
        panic!("Expected a table, got {:?}", output.result);
    };
    assert_eq!(narrative, &None);
    assert!(grid.contains("| 刘洋 | 76000元 |"));
    assert!(grid.contains("| 张伟 | 75000元 |"));
    assert!(grid.contains("| 韩磊 | 77000元 |"));
}

#[tokio::test]
async fn test_join_query_over_company() {
    let pipeline = pipeline(Dataset::Company, Language::En).await;
    let sql = "SELECT e.name, d.name FROM employees e JOIN departments d ON e.department_id = d.id";

    let output = pipeline.run(sql).await;

    assert_eq!(extract(&sanitize(sql)).tables(), vec!["employees", "departments"]);
    assert_eq!(
        output.explanation.as_str(),
        "This query retrieves e.name, d.name from employees, departments, performing a join across tables."
    );
    let ResultBlock::Table { grid, .. } = &output.result else {
        panic!("Expected a table");
    };
    assert_eq!(grid.lines().filter(|l| l.starts_with('|')).count(), 11);
}

#[tokio::test]
async fn test_single_row_gets_narrative() {
    let pipeline = pipeline(Dataset::Staff, Language::Zh).await;

    let output = pipeline
        .run("```sql\nSELECT name, salary FROM employees ORDER BY salary DESC LIMIT 1;\n```")
        .await;

    assert_eq!(
        output.sql.as_str(),
        "SELECT name, salary FROM employees ORDER BY salary DESC LIMIT 1;"
    );
    assert_eq!(
        output.explanation.as_str(),
        "这个查询从employees表中获取name, salary，结果按salary desc排序，只显示前1条结果。"
    );

    let expected = "\
萧峰的薪水是84000元

+------+---------+
| name | salary  |
+======+=========+
| 萧峰 | 84000元 |
+------+---------+";
    assert_eq!(output.result.to_string(), expected);
}

#[tokio::test]
async fn test_missing_table_is_reported_verbatim() {
    let pipeline = pipeline(Dataset::Staff, Language::En).await;

    let output = pipeline.run("SELECT * FROM foo").await;

    assert_eq!(output.result, ResultBlock::Error("no such table: foo".to_string()));
    assert_eq!(output.explanation.as_str(), "This query retrieves * from foo.");
    assert_eq!(
        output.to_string(),
        "SQL query: SELECT * FROM foo\nExplanation: This query retrieves * from foo.\nResult:\nno such table: foo"
    );
}

#[tokio::test]
async fn test_empty_result() {
    let pipeline = pipeline(Dataset::Staff, Language::Zh).await;

    let output = pipeline
        .run("SELECT name FROM employees WHERE salary > 1000000")
        .await;

    assert_eq!(output.result, ResultBlock::Empty("没有找到匹配的结果。".to_string()));
}

#[tokio::test]
async fn test_aggregate_with_group_and_having() {
    let pipeline = pipeline(Dataset::Staff, Language::En).await;

    let output = pipeline
        .run("SELECT department, COUNT(*) FROM employees GROUP BY department HAVING COUNT(*) > 4 ORDER BY department")
        .await;

    assert_eq!(
        output.explanation.as_str(),
        "This query retrieves department, count(*) from employees, grouped by department, keeping groups where count(*) > 4, ordered by department."
    );
    let ResultBlock::Table { grid, .. } = &output.result else {
        panic!("Expected a table");
    };
    // Every department has exactly five people.
    assert_eq!(grid.matches("|        5 |").count(), 4);
}

#[tokio::test]
async fn test_clauses_absent_sentence_well_formed() {
    let pipeline = pipeline(Dataset::Staff, Language::En).await;

    let output = pipeline.run("SELECT COUNT(*) FROM employees").await;

    let explanation = output.explanation.as_str();
    assert_eq!(explanation, "This query retrieves count(*) from employees.");
    for absent in ["filtered", "grouped", "ordered", "limited", "join"] {
        assert!(!explanation.contains(absent));
    }
    assert!(output.result.to_string().contains("|       20 |"));
}

#[tokio::test]
async fn test_non_sql_input() {
    let pipeline = pipeline(Dataset::None, Language::En).await;

    let output = pipeline.run("I don't understand that question.").await;

    assert!(extract(&output.sql).is_empty());
    assert_eq!(output.explanation.as_str(), "This query.");
    assert!(output.result.is_error());
}

#[test]
fn test_extraction_is_pure() {
    let stmt = sanitize("SELECT name FROM employees WHERE salary > 70000 ORDER BY name LIMIT 5");

    let first = extract(&stmt);
    let second = extract(&stmt);

    assert_eq!(first, second);
    assert!(first.contains(ClauseKind::Limit));
}

#[tokio::test]
async fn test_store_is_shared_across_requests() {
    let db = store(Dataset::None).await;
    let pipeline = Pipeline::with_defaults(Arc::clone(&db), Language::En);

    pipeline.run("CREATE TABLE notes (body TEXT)").await;
    pipeline.run("INSERT INTO notes VALUES ('hello')").await;
    let output = pipeline.run("SELECT body FROM notes").await;

    assert!(output.result.to_string().contains("| hello |"));
    db.close().await.unwrap();
}
