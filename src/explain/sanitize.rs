//! Cleanup of raw SQL text returned by the translation step.
//!
//! LLMs like to wrap SQL in markdown fences (```` ```sql ... ``` ````). The
//! sanitizer removes those delimiters and surrounding whitespace and
//! otherwise leaves the text alone; it does not check that the result is SQL.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Matches a fence delimiter with an optional SQL language tag.
const FENCE_PATTERN: &str = r"(?i)```(?:(?:sqlite|postgresql|postgres|mysql|sql)\b)?";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).expect("fence pattern is valid"))
}

/// A SQL statement with formatting artifacts removed.
///
/// Created once per request by [`sanitize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedSql(String);

impl SanitizedSql {
    /// Returns the cleaned statement text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing survived sanitization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SanitizedSql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips code fences and surrounding whitespace from a raw statement.
///
/// Fence removal repeats until no delimiter remains, so the output never
/// contains a fence and `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> SanitizedSql {
    let fence = fence_regex();
    let mut text = raw.to_string();

    while fence.is_match(&text) {
        text = fence.replace_all(&text, "").into_owned();
    }

    SanitizedSql(text.trim().to_string())
}
