//! Fixed-template explanation sentences.

use std::fmt;

use super::clauses::{ClauseKind, ClauseSet};
use super::phrasebook::{fill, Phrasebook};

/// A one-sentence description of what a statement does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation(String);

impl Explanation {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the explanation sentence for a set of clauses.
///
/// Fragments are appended in a fixed order and only for clauses that are
/// present: source tables, join, filter, grouping, group filter, ordering,
/// limit. An empty clause set yields the lead-in and closing mark only.
pub fn explain(clauses: &ClauseSet, phrases: &Phrasebook) -> Explanation {
    let mut sentence = String::from(phrases.lead_in);
    let tables = clauses.tables();

    if let (Some(select), Some(_)) = (
        clauses.get(ClauseKind::Select),
        clauses.get(ClauseKind::From),
    ) {
        let fields = select.text();
        let table_list = tables.join(phrases.table_separator);
        let args = if phrases.tables_first {
            [table_list.as_str(), fields.as_str()]
        } else {
            [fields.as_str(), table_list.as_str()]
        };
        sentence.push_str(&fill(phrases.retrieves, &args));
    }

    if tables.len() > 1 {
        sentence.push_str(phrases.join);
    }

    let fragments = [
        (ClauseKind::Where, phrases.filtered_by),
        (ClauseKind::GroupBy, phrases.grouped_by),
        (ClauseKind::Having, phrases.having),
        (ClauseKind::OrderBy, phrases.ordered_by),
    ];
    for (kind, phrase) in fragments {
        if let Some(clause) = clauses.get(kind) {
            sentence.push_str(&fill(phrase, &[clause.text().as_str()]));
        }
    }

    if let Some(value) = clauses.get(ClauseKind::Limit).and_then(|limit| limit.first()) {
        sentence.push_str(&fill(phrases.limited_to, &[value.as_str()]));
    }

    sentence.push_str(phrases.closing);
    Explanation(sentence)
}
