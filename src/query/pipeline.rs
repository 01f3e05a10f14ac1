//! The per-request path from raw SQL text to a displayable transcript.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::executor::{execute, ExecutionOutcome};
use crate::db::DatabaseClient;
use crate::explain::{
    explain, extract, sanitize, ClauseSet, Explanation, Language, Phrasebook, SanitizedSql,
};
use crate::format::{FormatRules, ResultBlock, ResultFormatter};

/// Everything shown to the user for one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedOutput {
    pub sql: SanitizedSql,
    pub explanation: Explanation,
    pub result: ResultBlock,
    phrases: &'static Phrasebook,
}

impl fmt::Display for FormattedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.phrases.sql_label, self.sql)?;
        writeln!(f, "{} {}", self.phrases.explanation_label, self.explanation)?;
        writeln!(f, "{}", self.phrases.result_label)?;
        write!(f, "{}", self.result)
    }
}

/// Sanitizes, explains, executes and formats statements.
///
/// Holds the shared store handle but does not own its lifecycle; callers
/// close the store themselves.
pub struct Pipeline {
    db: Arc<dyn DatabaseClient>,
    formatter: ResultFormatter,
    phrases: &'static Phrasebook,
}

impl Pipeline {
    pub fn new(db: Arc<dyn DatabaseClient>, language: Language, rules: FormatRules) -> Self {
        let phrases = language.phrasebook();
        Self {
            db,
            formatter: ResultFormatter::new(rules, phrases),
            phrases,
        }
    }

    /// Builds a pipeline with the built-in presentation rules.
    pub fn with_defaults(db: Arc<dyn DatabaseClient>, language: Language) -> Self {
        Self::new(db, language, FormatRules::defaults_for(language))
    }

    pub fn database(&self) -> &Arc<dyn DatabaseClient> {
        &self.db
    }

    /// Runs one raw statement through the whole pipeline.
    ///
    /// Never fails: store errors end up in the result block.
    pub async fn run(&self, raw: &str) -> FormattedOutput {
        let stmt = sanitize(raw);
        debug!(sql = %stmt, "Running statement");

        let clauses = extract(&stmt);
        let outcome = execute(self.db.as_ref(), &stmt).await;

        self.format(stmt, &outcome, &clauses)
    }

    /// Combines an execution outcome with the explanation of `clauses`.
    pub fn format(
        &self,
        sql: SanitizedSql,
        outcome: &ExecutionOutcome,
        clauses: &ClauseSet,
    ) -> FormattedOutput {
        FormattedOutput {
            sql,
            explanation: explain(clauses, self.phrases),
            result: self.formatter.format(outcome),
            phrases: self.phrases,
        }
    }
}
