use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::base::{ChatClient, ChatResponse, CompletionOptions};
use crate::models::message::Message;

#[derive(Debug, Clone)]
pub enum MockReply {
    Content(Option<String>),
    NoChoices,
    Failure(String),
}

impl MockReply {
    pub fn text(text: &str) -> Self {
        MockReply::Content(Some(text.to_string()))
    }
}

/// One call as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
    pub server_address: Option<String>,
    pub options: CompletionOptions,
}

/// A scripted chat client that records every request and replays queued replies
pub struct MockChatClient {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatClient {
    /// Replay `replies` in order, then answer with empty content.
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: MockReply::text(""),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with the same reply.
    pub fn always(reply: MockReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn get_chat_response(
        &self,
        model: &str,
        messages: &[Message],
        server_address: Option<&str>,
        options: &CompletionOptions,
    ) -> Result<ChatResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            server_address: server_address.map(str::to_string),
            options: options.clone(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Content(content) => Ok(ChatResponse::with_content(content.as_deref())),
            MockReply::NoChoices => Ok(ChatResponse::default()),
            MockReply::Failure(message) => Err(anyhow!(message)),
        }
    }
}
