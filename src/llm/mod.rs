//! Natural-language to SQL translation for db-narrate.
//!
//! The translator is an external collaborator behind the `LlmClient` trait.
//! Its output is raw text; the explain pipeline cleans it before use.

pub mod mock;
pub mod openai;
pub mod prompt;
pub mod types;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::{build_messages, build_system_prompt};
pub use types::{Message, Role};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;

/// Trait for LLM clients that can generate completions.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages and returns the
    /// model's reply unchanged.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    /// Offline pattern-based client (no API key required).
    Mock,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {s}. Expected: openai or mock")),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creates the translator described by `config`.
///
/// The OpenAI key is read from `OPENAI_API_KEY`.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    match config.provider {
        LlmProvider::OpenAi => Ok(Arc::new(OpenAiClient::from_env(&config.model)?)),
        LlmProvider::Mock => Ok(Arc::new(MockLlmClient::new())),
    }
}
