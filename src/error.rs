//! Error types for db-narrate.
//!
//! Per-request SQL failures never surface here; they are captured as
//! [`crate::query::ExecutionOutcome::Failed`]. This enum covers the ambient
//! failures around the pipeline: configuration, connections, and the
//! translation collaborator.

use thiserror::Error;

/// Main error type for db-narrate operations.
#[derive(Error, Debug)]
pub enum NarrateError {
    /// Data store connection errors (bad URL, unreadable file, seed failure).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement rejected by the data store. Carries the store's diagnostic
    /// text unchanged.
    #[error("Query error: {0}")]
    Query(String),

    /// LLM API errors (rate limits, auth, timeouts, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors (invalid config file, unknown option values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NarrateError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    ///
    /// Used where a diagnostic must be shown exactly as the source produced it.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(m)
            | Self::Query(m)
            | Self::Llm(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }
}

/// Result type alias using NarrateError.
pub type Result<T> = std::result::Result<T, NarrateError>;
