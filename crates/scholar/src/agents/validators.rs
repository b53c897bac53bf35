use indoc::indoc;
use serde_json::json;

use super::base::{AgentBase, PromptSpec, RequestOverrides};
use crate::errors::AgentResult;
use crate::providers::base::CompletionOptions;

/// Which pair of texts a [`TextValidator`] judges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextValidatorKind {
    /// (original text, summary)
    Summary,
    /// (topic, final article)
    Article,
    /// (topic, draft article)
    Draft,
    /// (original data, sanitized data)
    SanitizedData,
}

impl TextValidatorKind {
    pub fn agent_name(&self) -> &'static str {
        match self {
            TextValidatorKind::Summary => "SummarizeValidatorAgent",
            TextValidatorKind::Article => "ValidatorAgent",
            TextValidatorKind::Draft => "WriteArticleValidatorAgent",
            TextValidatorKind::SanitizedData => "SanitizeDataValidatorAgent",
        }
    }

    fn prompt(&self) -> &'static PromptSpec {
        match self {
            TextValidatorKind::Summary => &SUMMARY_PROMPT,
            TextValidatorKind::Article => &ARTICLE_PROMPT,
            TextValidatorKind::Draft => &DRAFT_PROMPT,
            TextValidatorKind::SanitizedData => &SANITIZED_PROMPT,
        }
    }

    fn context(&self, primary: &str, secondary: &str) -> serde_json::Value {
        match self {
            TextValidatorKind::Summary => json!({ "original_text": primary, "summary": secondary }),
            TextValidatorKind::Article | TextValidatorKind::Draft => {
                json!({ "topic": primary, "article": secondary })
            }
            TextValidatorKind::SanitizedData => {
                json!({ "original": primary, "sanitized": secondary })
            }
        }
    }
}

const SUMMARY_PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert in scientific summary validation.",
    user_template: "Validate the following summary:\n{{ summary }}\n\nOriginal Text:\n{{ original_text }}",
};

const ARTICLE_PROMPT: PromptSpec = PromptSpec {
    system: "You are an AI assistant that validates research articles for accuracy, completeness, and adherence to academic standards.",
    user_template: indoc! {"
        Given the topic and the research article below, assess whether the article comprehensively covers the topic, follows a logical structure, and maintains academic standards.
        Provide a brief analysis and rate the article on a scale of 1 to 5, where 5 indicates excellent quality.

        Topic: {{ topic }}

        Article:
        {{ article }}

        Validation:"},
};

const DRAFT_PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert in academic article validation.",
    user_template: indoc! {"
        Check whether the draft below stays on the given topic and is organised as a research article.
        List any sections that are missing or off-topic, then give a one-line verdict.

        Topic: {{ topic }}

        Draft:
        {{ article }}

        Validation:"},
};

const SANITIZED_PROMPT: PromptSpec = PromptSpec {
    system: "You are an expert in data privacy validation.",
    user_template: indoc! {"
        Verify that the sanitized data below no longer contains names, dates of birth, addresses, identifiers or any other private information present in the original.
        Point out anything that still leaks, or state that the sanitization is complete.

        Sanitized Data:
        {{ sanitized }}

        Original Data:
        {{ original }}

        Validation:"},
};

/// An agent that judges a produced text against its source and returns the
/// model's assessment as plain text.
pub struct TextValidator {
    base: AgentBase,
    kind: TextValidatorKind,
}

impl TextValidator {
    pub fn new(base: AgentBase, kind: TextValidatorKind) -> Self {
        Self { base, kind }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn kind(&self) -> TextValidatorKind {
        self.kind
    }

    pub async fn execute(
        &self,
        primary: &str,
        secondary: &str,
        overrides: &RequestOverrides,
    ) -> AgentResult<String> {
        let messages = self
            .kind
            .prompt()
            .render(&self.kind.context(primary, secondary))?;
        self.base
            .complete(&messages, overrides, &CompletionOptions::generation())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, OllamaSettings};
    use crate::models::message::Role;
    use crate::providers::mock::{MockChatClient, MockReply};
    use std::sync::Arc;

    fn validator(client: Arc<MockChatClient>, kind: TextValidatorKind) -> TextValidator {
        let config = AgentConfig::new(kind.agent_name(), 2, false, &OllamaSettings::default());
        TextValidator::new(AgentBase::new(config, client), kind)
    }

    #[tokio::test]
    async fn test_summary_validation_prompt() {
        let client = Arc::new(MockChatClient::always(MockReply::text("Accurate.")));
        let verdict = validator(client.clone(), TextValidatorKind::Summary)
            .execute("Long paper text...", "Short summary.", &RequestOverrides::default())
            .await
            .unwrap();

        assert_eq!(verdict, "Accurate.");
        let messages = &client.calls()[0].messages;
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[1].content,
            "Validate the following summary:\nShort summary.\n\nOriginal Text:\nLong paper text..."
        );
    }

    #[tokio::test]
    async fn test_article_validation_prompt() {
        let client = Arc::new(MockChatClient::always(MockReply::text("Rating: 4")));
        let verdict = validator(client.clone(), TextValidatorKind::Article)
            .execute("Quantum error correction", "The article body.", &RequestOverrides::default())
            .await
            .unwrap();

        assert_eq!(verdict, "Rating: 4");
        let user = &client.calls()[0].messages[1].content;
        assert!(user.contains("Topic: Quantum error correction"));
        assert!(user.contains("Article:\nThe article body."));
        assert!(user.contains("scale of 1 to 5"));
        assert!(user.ends_with("Validation:"));
    }

    #[tokio::test]
    async fn test_each_kind_keeps_both_inputs() {
        for kind in [
            TextValidatorKind::Summary,
            TextValidatorKind::Article,
            TextValidatorKind::Draft,
            TextValidatorKind::SanitizedData,
        ] {
            let client = Arc::new(MockChatClient::always(MockReply::Content(None)));
            let verdict = validator(client.clone(), kind)
                .execute("FIRST-INPUT", "SECOND-INPUT", &RequestOverrides::default())
                .await
                .unwrap();

            assert_eq!(verdict, "");
            let messages = &client.calls()[0].messages;
            assert_eq!(messages.len(), 2);
            assert!(messages[1].content.contains("FIRST-INPUT"), "{:?}", kind);
            assert!(messages[1].content.contains("SECOND-INPUT"), "{:?}", kind);
        }
    }
}
