//! Command-line argument parsing for db-narrate.

use crate::config::Config;
use crate::db::Dataset;
use crate::explain::Language;
use crate::llm::LlmProvider;
use clap::Parser;
use std::path::PathBuf;

/// Ask questions about a SQLite database and get the SQL, a plain-language
/// explanation, and the formatted result.
#[derive(Parser, Debug)]
#[command(name = "narrate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Question to answer. Starts an interactive session when omitted.
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Run this SQL directly instead of translating a question
    #[arg(long, value_name = "SQL", conflicts_with = "question")]
    pub sql: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "NARRATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite URL (e.g., sqlite::memory: or sqlite://staff.db)
    #[arg(short = 'd', long, value_name = "URL")]
    pub database: Option<String>,

    /// Demo dataset to load: staff, company or none
    #[arg(long, value_name = "NAME")]
    pub dataset: Option<Dataset>,

    /// SQL script to run after the dataset is loaded
    #[arg(long, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// LLM provider: openai or mock
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<LlmProvider>,

    /// Output language: en or zh
    #[arg(short = 'l', long, value_name = "LANG")]
    pub language: Option<Language>,

    /// Write logs to the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Sql(String),
    Question(String),
    Interactive,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    pub fn mode(&self) -> Mode {
        match (&self.sql, &self.question) {
            (Some(sql), _) => Mode::Sql(sql.clone()),
            (None, Some(question)) => Mode::Question(question.clone()),
            (None, None) => Mode::Interactive,
        }
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(provider) = self.llm {
            config.llm.provider = provider;
        }
        if let Some(url) = &self.database {
            config.database.url = url.clone();
        }
        if let Some(dataset) = self.dataset {
            config.database.dataset = dataset;
        }
        if let Some(seed) = &self.seed {
            config.database.seed = Some(seed.clone());
        }
    }
}
