//! Question answering against the company dataset with the offline translator.

use std::sync::Arc;

use db_narrate::config::{Config, DatabaseConfig};
use db_narrate::db::{self, Dataset};
use db_narrate::explain::Language;
use db_narrate::format::ResultBlock;
use db_narrate::llm::MockLlmClient;
use db_narrate::query::{Assistant, Pipeline};

async fn assistant(language: Language) -> Assistant {
    let db = db::connect(&DatabaseConfig::default()).await.unwrap();
    Assistant::new(
        Arc::new(MockLlmClient::new()),
        Pipeline::with_defaults(db, language),
    )
}

#[tokio::test]
async fn test_highest_salary_question() {
    let assistant = assistant(Language::Zh).await;

    let output = assistant.ask("谁的薪水最高？").await.unwrap();

    assert_eq!(
        output.sql.as_str(),
        "SELECT name, salary FROM employees ORDER BY salary DESC LIMIT 1;"
    );
    let ResultBlock::Table { narrative, .. } = &output.result else {
        panic!("Expected a table, got {:?}", output.result);
    };
    assert_eq!(narrative.as_deref(), Some("周浩的薪水是82000元"));
    assert!(output.to_string().starts_with("SQL查询: SELECT name, salary"));
}

#[tokio::test]
async fn test_join_question() {
    let assistant = assistant(Language::En).await;

    let output = assistant
        .ask("Which department does everyone work in?")
        .await
        .unwrap();

    assert!(output
        .explanation
        .as_str()
        .contains("from employees, departments, performing a join across tables"));
    assert!(output.result.to_string().contains("| 赵静 |"));
}

#[tokio::test]
async fn test_average_salary_by_department() {
    let assistant = assistant(Language::En).await;

    let output = assistant
        .ask("What is the average salary per department?")
        .await
        .unwrap();

    assert!(output.explanation.as_str().contains("grouped by d.name"));
    let ResultBlock::Table { narrative, grid } = &output.result else {
        panic!("Expected a table");
    };
    assert_eq!(narrative, &None);
    // AVG(e.salary) does not match the exact `salary` pattern.
    assert!(!grid.contains('元'));
}

#[tokio::test]
async fn test_unanswerable_question_reports_store_error() {
    let assistant = assistant(Language::En).await;

    let output = assistant.ask("Tell me a joke").await.unwrap();

    assert_eq!(output.explanation.as_str(), "This query.");
    assert!(output.result.is_error());
}

#[tokio::test]
async fn test_config_driven_setup() {
    let config: Config = toml::from_str(
        r#"
language = "en"
[database]
dataset = "staff"
[[format.narratives]]
subject = "name"
attribute = "department"
template = "{subject} works in {value}"
"#,
    )
    .unwrap();
    let db = db::connect(&config.database).await.unwrap();
    let assistant = Assistant::new(
        Arc::new(MockLlmClient::new().with_response(
            "zhang",
            "SELECT name, department FROM employees WHERE id = 1",
        )),
        Pipeline::new(db, config.language, config.format_rules()),
    );

    let output = assistant.ask("Where does Zhang work?").await.unwrap();

    let ResultBlock::Table { narrative, .. } = &output.result else {
        panic!("Expected a table");
    };
    assert_eq!(narrative.as_deref(), Some("张伟 works in IT"));
    assert_eq!(config.database.dataset, Dataset::Staff);
}
