use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::base::{ChatClient, ChatResponse, CompletionOptions};
use crate::config::{normalize_host, OllamaSettings, DEFAULT_API_KEY};
use crate::models::message::Message;

pub const OLLAMA_HOST: &str = "http://localhost:11434";
pub const API_SUFFIX: &str = "/v1";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(flatten)]
    options: &'a CompletionOptions,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

/// HTTP adapter for Ollama's OpenAI-compatible API.
pub struct OllamaClient {
    client: Client,
    host: String,
    api_key: String,
}

impl OllamaClient {
    pub fn new<H: Into<String>, K: Into<String>>(host: H, api_key: K) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self {
            client,
            host: normalize_host(&host.into()),
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &OllamaSettings) -> Result<Self> {
        Self::new(settings.host(), settings.api_key.clone())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn base_url(&self, server_address: Option<&str>) -> String {
        let host = server_address
            .map(normalize_host)
            .unwrap_or_else(|| self.host.clone());
        format!("{}{}", host, API_SUFFIX)
    }

    /// Names of the models installed on the server (`GET /api/tags`).
    pub async fn list_models(&self, server_address: Option<&str>) -> Result<Vec<String>> {
        let host = server_address
            .map(normalize_host)
            .unwrap_or_else(|| self.host.clone());
        let url = format!("{}/api/tags", host);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => {
                let tags: TagsResponse = response.json().await?;
                Ok(tags.models.into_iter().map(|model| model.name).collect())
            }
            status => Err(anyhow!("Request failed: {}", status)),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            host: OLLAMA_HOST.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn get_chat_response(
        &self,
        model: &str,
        messages: &[Message],
        server_address: Option<&str>,
        options: &CompletionOptions,
    ) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url(server_address));
        let payload = ChatRequest {
            model,
            messages,
            options,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!("Request failed: {}\nModel: {}", status, model)),
        }
    }
}
