use serde::Serialize;

use super::base::{AgentBase, PromptSpec, RequestOverrides};
use crate::errors::AgentResult;
use crate::models::results::ArticleResult;
use crate::providers::base::CompletionOptions;

pub const NAME: &str = "WriteArticleTool";

const PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert academic writer.",
    user_template: "Write a research article on the following topic:\nTopic: {{ topic }}\n\n{% if outline %}Outline:\n{{ outline }}\n\n{% endif %}Article:\n",
};

#[derive(Serialize)]
struct Context<'a> {
    topic: &'a str,
    outline: Option<&'a str>,
}

pub struct WriteArticleTool {
    base: AgentBase,
}

impl WriteArticleTool {
    pub fn new(base: AgentBase) -> Self {
        Self { base }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Draft a research article; the outline section is only sent when non-empty.
    pub async fn execute(
        &self,
        topic: &str,
        outline: Option<&str>,
        overrides: &RequestOverrides,
    ) -> AgentResult<ArticleResult> {
        let outline = outline.filter(|o| !o.trim().is_empty());
        let messages = PROMPT.render(&Context { topic, outline })?;
        let article = self
            .base
            .complete(&messages, overrides, &CompletionOptions::generation())
            .await?;
        Ok(ArticleResult { article })
    }
}
