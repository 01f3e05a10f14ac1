//! Prompt construction for the SQL translator.

use crate::db::Schema;
use crate::llm::types::Message;

const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are an assistant that turns natural-language questions into SQLite queries.

{schema}
INSTRUCTIONS:
- Return ONLY the SQL query, with no other text or explanation
- Use only the tables and columns listed above
- Join tables through the listed foreign keys
- Comparisons, ordering and aggregate functions are all allowed
- Questions may be asked in any language; answer with SQL only"#;

/// Builds the system prompt with the schema description injected.
pub fn build_system_prompt(schema: &Schema) -> String {
    SYSTEM_PROMPT_TEMPLATE.replace("{schema}", &schema.format_for_llm())
}

/// Builds the request for one question. Every question is translated on its
/// own; no history is carried between questions.
pub fn build_messages(system_prompt: &str, question: &str) -> Vec<Message> {
    vec![Message::system(system_prompt), Message::user(question)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Column, ForeignKey, Table};
    use crate::llm::types::Role;

    fn company_schema() -> Schema {
        Schema {
            tables: vec![
                Table {
                    name: "departments".to_string(),
                    columns: vec![
                        Column::new("id", "INTEGER").nullable(false),
                        Column::new("name", "TEXT"),
                        Column::new("location", "TEXT"),
                    ],
                    primary_key: vec!["id".to_string()],
                },
                Table {
                    name: "employees".to_string(),
                    columns: vec![
                        Column::new("id", "INTEGER").nullable(false),
                        Column::new("name", "TEXT"),
                        Column::new("department_id", "INTEGER"),
                        Column::new("salary", "REAL"),
                    ],
                    primary_key: vec!["id".to_string()],
                },
            ],
            foreign_keys: vec![ForeignKey::new("employees", "department_id", "departments", "id")],
        }
    }

    #[test]
    fn test_system_prompt_contains_schema() {
        let prompt = build_system_prompt(&company_schema());

        assert!(prompt.contains("Table: employees"));
        assert!(prompt.contains("  - salary: REAL"));
        assert!(prompt.contains("employees.department_id -> departments.id"));
        assert!(prompt.contains("SQLite"));
        assert!(prompt.contains("Return ONLY the SQL query"));
    }

    #[test]
    fn test_messages_are_system_then_user() {
        let messages = build_messages("prompt", "谁的薪水最高？");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "谁的薪水最高？");
    }
}
