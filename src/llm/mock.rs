//! Mock LLM client for testing and offline use.
//!
//! Answers from keyword patterns over the demo datasets, wrapping the SQL in a
//! fenced block the way chat models usually do.

use async_trait::async_trait;

use crate::error::{NarrateError, Result};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Built-in (keywords, SQL) pairs. A pattern fires when every keyword occurs
/// in the lowercased question.
const DEFAULT_PATTERNS: &[(&[&str], &str)] = &[
    (
        &["highest", "salary"],
        "SELECT name, salary FROM employees ORDER BY salary DESC LIMIT 1",
    ),
    (
        &["薪水最高"],
        "SELECT name, salary FROM employees ORDER BY salary DESC LIMIT 1",
    ),
    (
        &["average", "department"],
        "SELECT d.name, AVG(e.salary) FROM employees e JOIN departments d ON e.department_id = d.id GROUP BY d.name",
    ),
    (
        &["平均"],
        "SELECT d.name, AVG(e.salary) FROM employees e JOIN departments d ON e.department_id = d.id GROUP BY d.name",
    ),
    (
        &["department"],
        "SELECT e.name, d.name FROM employees e JOIN departments d ON e.department_id = d.id",
    ),
    (
        &["部门"],
        "SELECT e.name, d.name FROM employees e JOIN departments d ON e.department_id = d.id",
    ),
    (&["all employees"], "SELECT * FROM employees"),
    (&["所有员工"], "SELECT * FROM employees"),
];

/// Mock LLM client that returns canned SQL based on input patterns.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Checked before the built-in patterns (pattern -> response).
    custom_responses: Vec<(String, String)>,
    failure: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response returned when the question contains `pattern`.
    pub fn with_response(mut self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.custom_responses.push((pattern.into(), response.into()));
        self
    }

    /// Makes every completion fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    fn mock_response(&self, question: &str) -> String {
        let question = question.to_lowercase();

        if let Some((_, response)) = self
            .custom_responses
            .iter()
            .find(|(pattern, _)| question.contains(&pattern.to_lowercase()))
        {
            return response.clone();
        }

        DEFAULT_PATTERNS
            .iter()
            .find(|(keywords, _)| keywords.iter().all(|k| question.contains(k)))
            .map(|(_, sql)| format!("```sql\n{sql};\n```"))
            .unwrap_or_else(|| "I don't understand that question.".to_string())
    }

    fn last_user_message(messages: &[Message]) -> &str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(NarrateError::llm(message.clone()));
        }
        Ok(self.mock_response(Self::last_user_message(messages)))
    }
}
