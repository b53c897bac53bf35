use serde::Serialize;

use super::base::{AgentBase, PromptSpec, RequestOverrides};
use crate::errors::AgentResult;
use crate::models::results::ArticleResult;
use crate::providers::base::CompletionOptions;

pub const NAME: &str = "RefinerAgent";

const PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert scientific article refiner.",
    user_template: "Refine the following article:\n{{ text }}",
};

#[derive(Serialize)]
struct Context<'a> {
    text: &'a str,
}

pub struct RefinerAgent {
    base: AgentBase,
}

impl RefinerAgent {
    pub fn new(base: AgentBase) -> Self {
        Self { base }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Refine a draft article. The refined text comes back in the same shape
    /// the writer produces so it can be validated the same way.
    pub async fn execute(
        &self,
        text: &str,
        overrides: &RequestOverrides,
    ) -> AgentResult<ArticleResult> {
        let messages = PROMPT.render(&Context { text })?;
        let article = self
            .base
            .complete(&messages, overrides, &CompletionOptions::generation())
            .await?;
        Ok(ArticleResult { article })
    }
}
