//! Result presentation for db-narrate.
//!
//! Turns an execution outcome into the block shown under the explanation:
//! an enriched grid (with an optional narrative lead-in), the store's error
//! message, or a fixed "no results" line.

mod grid;
mod rules;

pub use grid::render_grid;
pub use rules::{
    default_enrichments, default_narratives, ColumnPattern, EnrichmentRule, FormatRules,
    NarrativeRule,
};

use std::fmt;

use crate::db::QueryResult;
use crate::explain::Phrasebook;
use crate::query::ExecutionOutcome;

/// The rendered result section of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBlock {
    /// A non-empty result set.
    Table {
        /// Lead-in sentence for single-row results.
        narrative: Option<String>,
        grid: String,
    },
    /// The store's diagnostic, unchanged.
    Error(String),
    /// The fixed "no matching results" text.
    Empty(String),
}

impl ResultBlock {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for ResultBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table {
                narrative: Some(narrative),
                grid,
            } => write!(f, "{narrative}\n\n{grid}"),
            Self::Table {
                narrative: None,
                grid,
            } => f.write_str(grid),
            Self::Error(message) | Self::Empty(message) => f.write_str(message),
        }
    }
}

/// Applies the presentation rules to execution outcomes.
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    rules: FormatRules,
    no_results: String,
}

impl ResultFormatter {
    pub fn new(rules: FormatRules, phrases: &Phrasebook) -> Self {
        Self {
            rules,
            no_results: phrases.no_results.to_string(),
        }
    }

    /// Renders an outcome into a result block.
    pub fn format(&self, outcome: &ExecutionOutcome) -> ResultBlock {
        match outcome {
            ExecutionOutcome::Failed(message) => ResultBlock::Error(message.clone()),
            ExecutionOutcome::Rows(result) if result.is_empty() => {
                ResultBlock::Empty(self.no_results.clone())
            }
            ExecutionOutcome::Rows(result) => self.format_rows(result),
        }
    }

    fn format_rows(&self, result: &QueryResult) -> ResultBlock {
        let headers: Vec<String> = result.columns.iter().map(|c| c.name.clone()).collect();
        let enrichments: Vec<_> = headers
            .iter()
            .map(|name| self.rules.enrichment_for(name))
            .collect();

        let rows: Vec<Vec<String>> = result
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, value)| match enrichments.get(i).copied().flatten() {
                        Some(rule) if !value.is_null() => rule.apply(&value.to_display_string()),
                        _ => value.to_display_string(),
                    })
                    .collect()
            })
            .collect();

        let narrative = match rows.as_slice() {
            [only] => self.narrative(&headers, only),
            _ => None,
        };

        ResultBlock::Table {
            narrative,
            grid: render_grid(&headers, &rows),
        }
    }

    /// Renders the first narrative rule whose columns are all present.
    fn narrative(&self, headers: &[String], row: &[String]) -> Option<String> {
        self.rules.narratives.iter().find_map(|rule| {
            let (subject, attribute) = rule.locate(headers)?;
            Some(rule.render(row.get(subject)?, row.get(attribute)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, Value};
    use crate::explain::{Language, ENGLISH};
    use pretty_assertions::assert_eq;

    fn formatter() -> ResultFormatter {
        ResultFormatter::new(FormatRules::defaults_for(Language::En), &ENGLISH)
    }

    fn employee_result(rows: Vec<Vec<Value>>) -> ExecutionOutcome {
        ExecutionOutcome::Rows(QueryResult::with_data(
            vec![ColumnInfo::new("name", "TEXT"), ColumnInfo::new("salary", "REAL")],
            rows,
        ))
    }

    #[test]
    fn test_single_row_gets_enrichment_and_narrative() {
        let outcome = employee_result(vec![vec![Value::from("张伟"), Value::Float(75000.0)]]);

        let block = formatter().format(&outcome);

        let ResultBlock::Table { narrative, grid } = &block else {
            panic!("Expected a table, got {block:?}");
        };
        assert_eq!(narrative.as_deref(), Some("张伟's salary is 75000元"));
        assert!(grid.contains("| 75000元 |"));
        assert!(block.to_string().starts_with("张伟's salary is 75000元\n\n+"));
    }

    #[test]
    fn test_multiple_rows_have_no_narrative() {
        let outcome = employee_result(vec![
            vec![Value::from("张伟"), Value::Int(75000)],
            vec![Value::from("王芳"), Value::Int(65000)],
        ]);

        let block = formatter().format(&outcome);

        let ResultBlock::Table { narrative, grid } = block else {
            panic!("Expected a table");
        };
        assert_eq!(narrative, None);
        assert!(grid.contains("65000元"));
    }

    #[test]
    fn test_null_is_not_enriched() {
        let outcome = employee_result(vec![
            vec![Value::from("a"), Value::Null],
            vec![Value::from("b"), Value::Int(1)],
        ]);

        let grid = formatter().format(&outcome).to_string();

        assert!(grid.contains("NULL"));
        assert!(!grid.contains("NULL元"));
    }

    #[test]
    fn test_error_passes_through() {
        let outcome = ExecutionOutcome::Failed("no such table: foo".to_string());
        let block = formatter().format(&outcome);
        assert_eq!(block, ResultBlock::Error("no such table: foo".to_string()));
        assert_eq!(block.to_string(), "no such table: foo");
    }

    #[test]
    fn test_empty_result() {
        let block = formatter().format(&employee_result(vec![]));
        assert_eq!(block.to_string(), "No matching results found.");
    }

    #[test]
    fn test_custom_rules() {
        let rules = FormatRules {
            enrichments: vec![EnrichmentRule::new("*_km", " km")],
            narratives: vec![NarrativeRule::new("city", "distance_km", "{subject} is {value} away")],
        };
        let formatter = ResultFormatter::new(rules, &ENGLISH);
        let outcome = ExecutionOutcome::Rows(QueryResult::with_data(
            vec![
                ColumnInfo::new("city", "TEXT"),
                ColumnInfo::new("distance_km", "INTEGER"),
            ],
            vec![vec![Value::from("Berlin"), Value::Int(880)]],
        ));

        let block = formatter.format(&outcome);

        let ResultBlock::Table { narrative, grid } = block else {
            panic!("Expected a table");
        };
        assert_eq!(narrative.as_deref(), Some("Berlin is 880 km away"));
        assert!(grid.contains("880 km"));
    }

    #[test]
    fn test_select_star_uses_result_columns() {
        let outcome = ExecutionOutcome::Rows(QueryResult::with_data(
            vec![
                ColumnInfo::new("id", "INTEGER"),
                ColumnInfo::new("name", "TEXT"),
                ColumnInfo::new("salary", "REAL"),
            ],
            vec![vec![Value::Int(3), Value::from("李斯"), Value::Float(80000.0)]],
        ));

        let block = formatter().format(&outcome);

        let ResultBlock::Table { narrative, grid } = block else {
            panic!("Expected a table");
        };
        assert_eq!(narrative.as_deref(), Some("李斯's salary is 80000元"));
        assert!(grid.contains("| id | name | salary  |"));
    }
}
