use serde::Serialize;

use super::base::{AgentBase, PromptSpec, RequestOverrides};
use crate::errors::AgentResult;
use crate::models::results::SummaryResult;
use crate::providers::base::CompletionOptions;

pub const NAME: &str = "SummarizeTool";

const PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert scientific summarizer.",
    user_template: "Summarize the following text:\n{{ text }}",
};

#[derive(Serialize)]
struct Context<'a> {
    text: &'a str,
}

pub struct SummarizeTool {
    base: AgentBase,
}

impl SummarizeTool {
    pub fn new(base: AgentBase) -> Self {
        Self { base }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Summarize scientific text.
    pub async fn execute(
        &self,
        text: &str,
        overrides: &RequestOverrides,
    ) -> AgentResult<SummaryResult> {
        let messages = PROMPT.render(&Context { text })?;
        let summary = self
            .base
            .complete(&messages, overrides, &CompletionOptions::generation())
            .await?;
        Ok(SummaryResult { summary })
    }
}
