//! OpenAI chat completions client.
//!
//! Sends the translation prompt and returns the model's raw reply. The reply
//! is not cleaned here; fence stripping happens in the explain pipeline.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::Message;
use super::LlmClient;
use crate::error::{NarrateError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const MAX_ATTEMPTS: u32 = 3;

const BACKOFF_BASE: Duration = Duration::from_millis(1000);

/// OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Why a single request attempt failed.
enum AttemptError {
    /// Worth another try after backing off.
    Transient(NarrateError),
    Fatal(NarrateError),
}

/// OpenAI LLM client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NarrateError::llm(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Creates a client for `model` using `OPENAI_API_KEY` and, when set,
    /// `OPENAI_BASE_URL` from the environment.
    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| NarrateError::config("OPENAI_API_KEY environment variable not set"))?;

        let mut config = OpenAiConfig::new(api_key, model);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        Self::new(config)
    }

    fn request_body<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages,
            temperature: 0.0,
        }
    }

    async fn attempt(&self, body: &ChatRequest<'_>) -> std::result::Result<String, AttemptError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AttemptError::Transient(NarrateError::llm(format!("Failed to read response: {e}")))
        })?;

        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            AttemptError::Fatal(NarrateError::llm(format!("Failed to parse response: {e}")))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AttemptError::Fatal(NarrateError::llm("OpenAI returned no choices")))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let body = self.request_body(messages);
        let mut delay = BACKOFF_BASE;
        let mut attempt = 1;

        loop {
            debug!(attempt, model = %self.config.model, "Sending chat completion");

            match self.attempt(&body).await {
                Ok(content) => return Ok(content),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(e)) if attempt >= MAX_ATTEMPTS => return Err(e),
                Err(AttemptError::Transient(e)) => {
                    warn!("Chat completion attempt {attempt} failed, retrying in {delay:?}: {e}");
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
            attempt += 1;
        }
    }
}

fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        AttemptError::Transient(NarrateError::llm("Request to OpenAI timed out"))
    } else if e.is_connect() {
        AttemptError::Transient(NarrateError::llm(
            "Failed to connect to OpenAI API. Check your network.",
        ))
    } else {
        AttemptError::Fatal(NarrateError::llm(format!("Request failed: {e}")))
    }
}

fn classify_status(status: StatusCode, body: &str) -> AttemptError {
    if status == StatusCode::UNAUTHORIZED {
        return AttemptError::Fatal(NarrateError::llm(
            "Authentication failed. Check your OPENAI_API_KEY.",
        ));
    }

    let error = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => NarrateError::llm(format!("OpenAI API error: {}", parsed.error.message)),
        Err(_) => NarrateError::llm(format!("OpenAI API error ({status}): {body}")),
    };

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        AttemptError::Transient(error)
    } else {
        AttemptError::Fatal(error)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
