//! Configuration management for db-narrate.
//!
//! Loads settings from a TOML file. Every section is optional; a missing file
//! yields the defaults (English output, OpenAI translator, in-memory SQLite
//! seeded with the company dataset, built-in presentation rules).

use crate::db::Dataset;
use crate::error::{NarrateError, Result};
use crate::explain::Language;
use crate::format::{
    default_enrichments, default_narratives, EnrichmentRule, FormatRules, NarrativeRule,
};
use crate::llm::openai::DEFAULT_MODEL;
use crate::llm::LlmProvider;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Language of explanations, narratives and transcript labels.
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub format: FormatConfig,
}

/// Translator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,

    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
        }
    }
}

/// Data store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite::memory:` or `sqlite://staff.db`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Demo dataset created on connect.
    #[serde(default)]
    pub dataset: Dataset,

    /// SQL script run after the dataset is loaded.
    #[serde(default)]
    pub seed: Option<PathBuf>,
}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            dataset: Dataset::default(),
            seed: None,
        }
    }
}

/// Presentation rules. A list given here replaces the built-in list of the
/// same kind; an omitted list keeps the built-ins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatConfig {
    pub enrichments: Option<Vec<EnrichmentRule>>,
    pub narratives: Option<Vec<NarrativeRule>>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("db-narrate")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file, or the defaults if it does not
    /// exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| NarrateError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            NarrateError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Resolves the presentation rules for the configured language.
    pub fn format_rules(&self) -> FormatRules {
        FormatRules {
            enrichments: self
                .format
                .enrichments
                .clone()
                .unwrap_or_else(default_enrichments),
            narratives: self
                .format
                .narratives
                .clone()
                .unwrap_or_else(|| default_narratives(self.language)),
        }
    }
}
