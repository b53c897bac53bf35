use serde::Serialize;
use std::sync::Arc;

use crate::config::AgentConfig;
use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::prompt_template::load_prompt;
use crate::providers::base::{ChatClient, CompletionOptions};

/// Per-call overrides of the agent's configured server and model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    pub server_address: Option<String>,
    pub model_name: Option<String>,
}

impl RequestOverrides {
    pub fn with_server<S: Into<String>>(mut self, server_address: S) -> Self {
        self.server_address = Some(server_address.into());
        self
    }

    pub fn with_model<S: Into<String>>(mut self, model_name: S) -> Self {
        self.model_name = Some(model_name.into());
        self
    }
}

/// A fixed system instruction plus a user template rendered with the caller's input.
pub struct PromptSpec {
    pub system: &'static str,
    pub user_template: &'static str,
}

impl PromptSpec {
    pub fn render<T: Serialize>(&self, context: &T) -> AgentResult<Vec<Message>> {
        let user = load_prompt(self.user_template, context)?;
        Ok(vec![Message::system(self.system), Message::user(user)])
    }
}

/// What every LLM-backed agent shares: its configuration and the chat client.
pub struct AgentBase {
    config: AgentConfig,
    client: Arc<dyn ChatClient>,
}

impl AgentBase {
    pub fn new(config: AgentConfig, client: Arc<dyn ChatClient>) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Issue exactly one chat call and return the first choice's text.
    ///
    /// `max_retries` is not consulted here: generation agents make a single
    /// attempt. Missing content degrades to an empty string; a transport
    /// failure or a response without choices is returned as
    /// [`AgentError::Request`].
    pub async fn complete(
        &self,
        messages: &[Message],
        overrides: &RequestOverrides,
        options: &CompletionOptions,
    ) -> AgentResult<String> {
        let model = overrides
            .model_name
            .as_deref()
            .unwrap_or(&self.config.model_name);
        let server = overrides
            .server_address
            .as_deref()
            .unwrap_or(&self.config.server_address);

        if self.config.verbose {
            tracing::info!(agent = %self.config.name, model, ?messages, "sending chat request");
        } else {
            tracing::debug!(agent = %self.config.name, model, "sending chat request");
        }

        let content = match self
            .client
            .get_chat_response(model, messages, Some(server), options)
            .await
        {
            Ok(response) => match response.first_choice() {
                Some(choice) => choice.message.content.clone(),
                None => return Err(self.failure(anyhow::anyhow!("response contained no choices"))),
            },
            Err(e) => return Err(self.failure(e)),
        };

        if self.config.verbose {
            tracing::info!(agent = %self.config.name, response = ?content, "chat response");
        }

        Ok(content.unwrap_or_default())
    }

    fn failure(&self, cause: anyhow::Error) -> AgentError {
        if self.config.verbose {
            tracing::error!(agent = %self.config.name, "request failed: {:#}", cause);
        }
        AgentError::Request {
            agent: self.config.name.clone(),
            cause,
        }
    }
}

pub(crate) fn require_text<'a>(value: Option<&'a str>, what: &str) -> AgentResult<&'a str> {
    match value {
        Some(text) => Ok(text),
        None => Err(AgentError::MissingInput(what.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OllamaSettings;
    use crate::models::message::Role;
    use crate::providers::mock::{MockChatClient, MockReply};

    fn base_with(client: Arc<MockChatClient>, max_retries: u32) -> AgentBase {
        let config = AgentConfig::new("TestAgent", max_retries, false, &OllamaSettings::default());
        AgentBase::new(config, client)
    }

    #[tokio::test]
    async fn test_defaults_apply_without_overrides() {
        let client = Arc::new(MockChatClient::always(MockReply::text("ok")));
        let base = base_with(client.clone(), 2);

        let text = base
            .complete(
                &[Message::system("s"), Message::user("u")],
                &RequestOverrides::default(),
                &CompletionOptions::generation(),
            )
            .await
            .unwrap();

        assert_eq!(text, "ok");
        let calls = client.calls();
        assert_eq!(calls[0].model, "deepseek-r1:1.5b");
        assert_eq!(calls[0].server_address.as_deref(), Some("http://localhost:11434"));
        assert_eq!(calls[0].options, CompletionOptions::generation());
    }

    #[tokio::test]
    async fn test_overrides_win() {
        let client = Arc::new(MockChatClient::always(MockReply::text("ok")));
        let base = base_with(client.clone(), 2);
        let overrides = RequestOverrides::default()
            .with_model("llama3.2:3b")
            .with_server("http://remote:11434");

        base.complete(&[Message::user("u")], &overrides, &CompletionOptions::default())
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].model, "llama3.2:3b");
        assert_eq!(calls[0].server_address.as_deref(), Some("http://remote:11434"));
    }

    #[tokio::test]
    async fn test_null_content_becomes_empty_string() {
        let client = Arc::new(MockChatClient::always(MockReply::Content(None)));
        let base = base_with(client, 2);

        let text = base
            .complete(&[Message::user("u")], &RequestOverrides::default(), &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_missing_choices_is_a_request_failure() {
        let client = Arc::new(MockChatClient::always(MockReply::NoChoices));
        let base = base_with(client, 2);

        let err = base
            .complete(&[Message::user("u")], &RequestOverrides::default(), &CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Request { ref agent, .. } if agent == "TestAgent"));
    }

    #[tokio::test]
    async fn test_single_attempt_despite_max_retries() {
        let client = Arc::new(MockChatClient::new(vec![
            MockReply::Failure("connection reset".to_string()),
            MockReply::text("would have succeeded"),
        ]));
        let base = base_with(client.clone(), 4);

        let err = base
            .complete(&[Message::user("u")], &RequestOverrides::default(), &CompletionOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn test_prompt_spec_renders_two_messages() {
        let spec = PromptSpec {
            system: "You are a test.",
            user_template: "Echo:\n{{ text }}",
        };
        let messages = spec.render(&serde_json::json!({ "text": "hello" })).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Echo:\nhello");
    }
}
