//! db-narrate - explain SQL statements and present their results.
//!
//! The core path is `explain` (sanitize, extract clauses, build a sentence),
//! `query` (execute and combine) and `format` (enriched result grids). The
//! remaining modules supply the store, the translator and the ambient setup.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod explain;
pub mod format;
pub mod llm;
pub mod logging;
pub mod query;
