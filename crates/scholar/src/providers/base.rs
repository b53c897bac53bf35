use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::message::Message;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<i64>,
    pub completion_tokens: Option<i64>,
    pub total_tokens: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: Option<u32>,
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The remote completion as returned by the server. Callers extract
/// `choices[0].message.content` themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Build a single-choice response; handy for scripted clients.
    pub fn with_content(content: Option<&str>) -> Self {
        ChatResponse {
            choices: vec![Choice {
                index: Some(0),
                message: ChoiceMessage {
                    role: Some("assistant".to_string()),
                    content: content.map(str::to_string),
                },
                finish_reason: Some("stop".to_string()),
            }],
            ..Default::default()
        }
    }

    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }
}

/// Sampling parameters passed through to the server unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompletionOptions {
    /// Settings shared by every content-generating agent.
    pub fn generation() -> Self {
        CompletionOptions {
            temperature: Some(0.3),
            max_tokens: Some(2049),
            extra: Map::new(),
        }
    }

    /// Settings for a one-word verdict.
    pub fn verdict() -> Self {
        CompletionOptions {
            temperature: Some(0.0),
            max_tokens: Some(16),
            extra: Map::new(),
        }
    }

    pub fn with_option<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// One outbound call to an OpenAI-compatible chat completion endpoint.
///
/// Implementations perform exactly one round trip per call and never retry;
/// failures are returned to the caller as-is.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn get_chat_response(
        &self,
        model: &str,
        messages: &[Message],
        server_address: Option<&str>,
        options: &CompletionOptions,
    ) -> Result<ChatResponse>;
}
