//! Declarative enrichment and narrative rules.
//!
//! Rules match result columns by name and never look at the SQL text, so
//! adding one does not touch extraction or explanation.

use regex::Regex;
use serde::Deserialize;
use std::fmt;

use crate::explain::Language;

/// A case-insensitive column name pattern. `*` matches any run of characters.
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct ColumnPattern {
    source: String,
    regex: Regex,
}

impl ColumnPattern {
    pub fn new(pattern: &str) -> Self {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        // Every literal part is escaped, so the pattern always compiles.
        let regex = Regex::new(&format!("(?i)^{body}$")).expect("escaped pattern is valid");
        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    pub fn matches(&self, column: &str) -> bool {
        self.regex.is_match(column)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl TryFrom<String> for ColumnPattern {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("column pattern must not be empty".to_string());
        }
        Ok(Self::new(&value))
    }
}

impl fmt::Debug for ColumnPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnPattern({:?})", self.source)
    }
}

impl PartialEq for ColumnPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Appends a unit suffix to every non-NULL value of matching columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrichmentRule {
    pub column: ColumnPattern,
    pub suffix: String,
}

impl EnrichmentRule {
    pub fn new(column: &str, suffix: impl Into<String>) -> Self {
        Self {
            column: ColumnPattern::new(column),
            suffix: suffix.into(),
        }
    }

    pub fn apply(&self, value: &str) -> String {
        format!("{value}{}", self.suffix)
    }
}

/// A lead-in sentence for single-row results.
///
/// Fires when one column matches `subject` and another matches `attribute`.
/// `{subject}` and `{value}` in the template are replaced with the two
/// (already enriched) cell values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NarrativeRule {
    pub subject: ColumnPattern,
    pub attribute: ColumnPattern,
    pub template: String,
}

impl NarrativeRule {
    pub fn new(subject: &str, attribute: &str, template: impl Into<String>) -> Self {
        Self {
            subject: ColumnPattern::new(subject),
            attribute: ColumnPattern::new(attribute),
            template: template.into(),
        }
    }

    /// Finds the subject and attribute column positions in `columns`.
    pub fn locate(&self, columns: &[String]) -> Option<(usize, usize)> {
        let subject = columns.iter().position(|c| self.subject.matches(c))?;
        let attribute = columns
            .iter()
            .enumerate()
            .position(|(i, c)| i != subject && self.attribute.matches(c))?;
        Some((subject, attribute))
    }

    /// Fills `{subject}` and `{value}` in one pass; substituted text is never
    /// rescanned.
    pub fn render(&self, subject: &str, value: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + subject.len() + value.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix("{subject}") {
                out.push_str(subject);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{value}") {
                out.push_str(value);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        out
    }
}

/// The full table of presentation rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormatRules {
    pub enrichments: Vec<EnrichmentRule>,
    pub narratives: Vec<NarrativeRule>,
}

impl FormatRules {
    /// The built-in rules: salaries in yuan, and a salary sentence for a
    /// single named employee.
    pub fn defaults_for(language: Language) -> Self {
        Self {
            enrichments: default_enrichments(),
            narratives: default_narratives(language),
        }
    }

    /// Returns the first enrichment rule matching `column`.
    pub fn enrichment_for(&self, column: &str) -> Option<&EnrichmentRule> {
        self.enrichments.iter().find(|rule| rule.column.matches(column))
    }
}

pub fn default_enrichments() -> Vec<EnrichmentRule> {
    vec![EnrichmentRule::new("salary", "元")]
}

pub fn default_narratives(language: Language) -> Vec<NarrativeRule> {
    let template = match language {
        Language::En => "{subject}'s salary is {value}",
        Language::Zh => "{subject}的薪水是{value}",
    };
    vec![NarrativeRule::new("name", "salary", template)]
}
