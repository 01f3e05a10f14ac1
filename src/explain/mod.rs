//! SQL explanation for db-narrate.
//!
//! Turns raw translator output into a sanitized statement, locates its
//! clauses with a keyword scan, and renders a one-sentence description.
//! Nothing here touches the data store.

mod builder;
mod clauses;
mod phrasebook;
mod sanitize;
mod tokens;

pub use builder::{explain, Explanation};
pub use clauses::{extract, Clause, ClauseKind, ClauseSet};
pub use phrasebook::{Language, Phrasebook, CHINESE, ENGLISH};
pub use sanitize::{sanitize, SanitizedSql};
pub use tokens::{Token, TokenStream};
