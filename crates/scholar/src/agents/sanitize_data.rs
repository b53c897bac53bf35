use serde::Serialize;

use super::base::{AgentBase, PromptSpec, RequestOverrides};
use crate::errors::AgentResult;
use crate::models::results::SanitizedResult;
use crate::providers::base::CompletionOptions;

pub const NAME: &str = "SanitizeDataTool";

const PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert in data sanitization.",
    user_template: "Sanitize the following data:\n{{ text }}",
};

#[derive(Serialize)]
struct Context<'a> {
    text: &'a str,
}

/// Removes private or identifying details from free text.
pub struct SanitizeDataTool {
    base: AgentBase,
}

impl SanitizeDataTool {
    pub fn new(base: AgentBase) -> Self {
        Self { base }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub async fn execute(
        &self,
        text: &str,
        overrides: &RequestOverrides,
    ) -> AgentResult<SanitizedResult> {
        let messages = PROMPT.render(&Context { text })?;
        let sanitized_data = self
            .base
            .complete(&messages, overrides, &CompletionOptions::generation())
            .await?;
        Ok(SanitizedResult { sanitized_data })
    }
}
