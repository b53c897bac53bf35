use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResult {
    pub article: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedResult {
    pub sanitized_data: String,
}

/// Output of a generation or text-validation agent. The payload is always a
/// string, empty when the model returned no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentOutput {
    Summary(SummaryResult),
    Article(ArticleResult),
    Sanitized(SanitizedResult),
    Validation(String),
}

impl AgentOutput {
    pub fn text(&self) -> &str {
        match self {
            AgentOutput::Summary(result) => &result.summary,
            AgentOutput::Article(result) => &result.article,
            AgentOutput::Sanitized(result) => &result.sanitized_data,
            AgentOutput::Validation(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AgentOutput::Summary(result) => result.summary,
            AgentOutput::Article(result) => result.article,
            AgentOutput::Sanitized(result) => result.sanitized_data,
            AgentOutput::Validation(text) => text,
        }
    }
}

impl From<SummaryResult> for AgentOutput {
    fn from(result: SummaryResult) -> Self {
        AgentOutput::Summary(result)
    }
}

impl From<ArticleResult> for AgentOutput {
    fn from(result: ArticleResult) -> Self {
        AgentOutput::Article(result)
    }
}

impl From<SanitizedResult> for AgentOutput {
    fn from(result: SanitizedResult) -> Self {
        AgentOutput::Sanitized(result)
    }
}
