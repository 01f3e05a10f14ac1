//! Whitespace tokenization for keyword scanning.

use super::sanitize::SanitizedSql;

/// A single whitespace-delimited word of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The word as written in the statement.
    pub text: String,
    /// Uppercase form used for keyword comparison.
    pub upper: String,
}

impl Token {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            upper: text.to_uppercase(),
        }
    }

    /// Returns true if this token is the given keyword (expected uppercase).
    pub fn is(&self, keyword: &str) -> bool {
        self.upper == keyword
    }
}

/// Ordered tokens of a sanitized statement. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Splits a statement on whitespace.
    ///
    /// A trailing `;` terminator is dropped so that `LIMIT 3;` yields `3`.
    pub fn new(stmt: &SanitizedSql) -> Self {
        let mut words: Vec<&str> = stmt.as_str().split_whitespace().collect();

        if let Some(last) = words.pop() {
            let last = last.trim_end_matches(';');
            if !last.is_empty() {
                words.push(last);
            }
        }

        Self {
            tokens: words.into_iter().map(Token::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Returns the tokens in `start..end`, clamped to the stream length.
    pub fn slice(&self, start: usize, end: usize) -> &[Token] {
        let end = end.min(self.tokens.len());
        let start = start.min(end);
        &self.tokens[start..end]
    }

    /// Returns true if the words of `keyword` appear consecutively at `index`.
    pub fn matches_at(&self, index: usize, keyword: &[&str]) -> bool {
        keyword
            .iter()
            .enumerate()
            .all(|(offset, word)| self.get(index + offset).is_some_and(|t| t.is(word)))
    }
}
