//! Question answering: translate, then run the explain pipeline.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::pipeline::{FormattedOutput, Pipeline};
use crate::error::{NarrateError, Result};
use crate::llm::{build_messages, build_system_prompt, LlmClient};

/// Answers natural-language questions about the connected store.
pub struct Assistant {
    llm: Arc<dyn LlmClient>,
    pipeline: Pipeline,
    /// Built from the store schema on first use.
    system_prompt: OnceCell<String>,
}

impl Assistant {
    pub fn new(llm: Arc<dyn LlmClient>, pipeline: Pipeline) -> Self {
        Self {
            llm,
            pipeline,
            system_prompt: OnceCell::new(),
        }
    }

    /// Translates `question` into SQL and runs it.
    ///
    /// Only translation and schema lookup can fail; store errors for the
    /// generated SQL are part of the returned output.
    pub async fn ask(&self, question: &str) -> Result<FormattedOutput> {
        let system_prompt = self
            .system_prompt
            .get_or_try_init(|| async {
                let schema = self.pipeline.database().describe_schema().await?;
                debug!(tables = schema.tables.len(), "Built translation prompt");
                Ok::<_, NarrateError>(build_system_prompt(&schema))
            })
            .await?;

        let raw = self
            .llm
            .complete(&build_messages(system_prompt, question))
            .await?;
        info!(question, "Translated question");

        Ok(self.pipeline.run(&raw).await)
    }
}
