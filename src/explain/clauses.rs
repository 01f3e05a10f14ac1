//! Clause extraction by keyword position scanning.
//!
//! This is a heuristic, not a parser. The statement is split into tokens and
//! scanned for a small table of clause keywords; each clause spans from just
//! after its keyword to the next recognized keyword. Keywords inside string
//! literals or quoted identifiers are not detected and will split a clause.

use std::collections::BTreeMap;
use std::fmt;

use super::sanitize::SanitizedSql;
use super::tokens::TokenStream;

/// The clause kinds recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseKind {
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
}

impl ClauseKind {
    /// Returns the keyword as it appears in SQL.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::OrderBy => "ORDER BY",
            Self::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Clause keywords in scan order. Multi-word keywords match only as a unit,
/// so a lone `ORDER` or `BY` never starts a clause.
const CLAUSE_KEYWORDS: &[(&[&str], ClauseKind)] = &[
    (&["SELECT"], ClauseKind::Select),
    (&["FROM"], ClauseKind::From),
    (&["WHERE"], ClauseKind::Where),
    (&["GROUP", "BY"], ClauseKind::GroupBy),
    (&["HAVING"], ClauseKind::Having),
    (&["ORDER", "BY"], ClauseKind::OrderBy),
    (&["LIMIT"], ClauseKind::Limit),
];

/// Join vocabulary skipped when collecting table names from the FROM span.
const JOIN_KEYWORDS: &[&str] = &[
    "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "OUTER", "CROSS", "NATURAL", "ON", "USING", "AND",
    "AS",
];

/// The tokens of one clause, without its keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    tokens: Vec<String>,
}

impl Clause {
    fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Tokens as written in the statement.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns true if the keyword was present but nothing followed it.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Lowercased tokens joined by single spaces, as used in explanations.
    pub fn text(&self) -> String {
        self.original_text().to_lowercase()
    }

    /// Tokens joined by single spaces with their original casing.
    pub fn original_text(&self) -> String {
        self.tokens.join(" ")
    }

    /// The first token, lowercased.
    pub fn first(&self) -> Option<String> {
        self.tokens.first().map(|t| t.to_lowercase())
    }
}

/// Clauses located in a statement, keyed by kind.
///
/// A kind is present if and only if its keyword was found. A present clause
/// may still be empty (`SELECT * FROM t WHERE`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseSet {
    clauses: BTreeMap<ClauseKind, Clause>,
}

impl ClauseSet {
    pub fn get(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.get(&kind)
    }

    pub fn contains(&self, kind: ClauseKind) -> bool {
        self.clauses.contains_key(&kind)
    }

    /// Returns true if no clause keyword was found at all.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Table names touched by the FROM span, lowercased, in order of appearance.
    ///
    /// Join keywords, aliases, and ON/USING conditions are skipped. A name is
    /// the first word after FROM, after each JOIN, or after a comma in the
    /// table list.
    pub fn tables(&self) -> Vec<String> {
        let Some(from) = self.get(ClauseKind::From) else {
            return Vec::new();
        };

        let mut tables = Vec::new();
        let mut expect_table = true;
        let mut in_condition = false;

        for token in from.tokens() {
            let upper = token.to_uppercase();

            match upper.as_str() {
                "JOIN" => {
                    expect_table = true;
                    in_condition = false;
                    continue;
                }
                "ON" | "USING" => {
                    expect_table = false;
                    in_condition = true;
                    continue;
                }
                _ if JOIN_KEYWORDS.contains(&upper.as_str()) => continue,
                _ => {}
            }

            if in_condition {
                continue;
            }

            // Text before a comma in a non-table position is an alias.
            let mut names = token.split(',');
            if !expect_table {
                names.next();
            }
            tables.extend(
                names
                    .filter(|name| !name.is_empty())
                    .map(str::to_lowercase),
            );

            // A comma ends the current table entry, alias or not.
            expect_table = token.ends_with(',');
        }

        tables
    }
}

/// Locates clause boundaries in a sanitized statement.
///
/// The first occurrence of each keyword wins. Pure: the same statement always
/// yields an equal `ClauseSet`.
pub fn extract(stmt: &SanitizedSql) -> ClauseSet {
    let stream = TokenStream::new(stmt);
    let positions = keyword_positions(&stream);

    let mut clauses = BTreeMap::new();
    for (i, &(start, width, kind)) in positions.iter().enumerate() {
        if clauses.contains_key(&kind) {
            continue;
        }

        let end = positions
            .get(i + 1)
            .map_or(stream.len(), |&(next, _, _)| next);

        let tokens = stream
            .slice(start + width, end)
            .iter()
            .map(|t| t.text.clone())
            .collect();

        clauses.insert(kind, Clause::new(tokens));
    }

    ClauseSet { clauses }
}

/// Scans left to right for clause keywords, returning `(index, width, kind)`.
fn keyword_positions(stream: &TokenStream) -> Vec<(usize, usize, ClauseKind)> {
    let mut positions = Vec::new();
    let mut index = 0;

    while index < stream.len() {
        let hit = CLAUSE_KEYWORDS
            .iter()
            .find(|(words, _)| stream.matches_at(index, words));

        match hit {
            Some((words, kind)) => {
                positions.push((index, words.len(), *kind));
                index += words.len();
            }
            None => index += 1,
        }
    }

    positions
}
