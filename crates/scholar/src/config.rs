use config::{Config, Environment};
use serde::Deserialize;

use crate::errors::{to_env_var, ConfigError};

pub const DEFAULT_SERVER: &str = "http://localhost:11434/v1";
pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";
pub const DEFAULT_API_KEY: &str = "ollama";
pub const DEFAULT_MAX_RESULTS: usize = 10;

pub const SERPER_URL: &str = "https://google.serper.dev/search";
pub const ARXIV_URL: &str = "http://export.arxiv.org/api/query";
pub const SERPAPI_URL: &str = "https://serpapi.com/search.json";

const OLLAMA_PREFIX: &str = "OLLAMA";
const SCHOLAR_PREFIX: &str = "SCHOLAR";

/// Connection settings for the OpenAI-compatible chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaSettings {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            server: default_server(),
            model: default_model(),
            api_key: default_api_key(),
        }
    }
}

impl OllamaSettings {
    /// Server address with any trailing `/v1` removed; the chat adapter adds it back.
    pub fn host(&self) -> String {
        normalize_host(&self.server)
    }
}

/// Credentials and endpoints for the search backends.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub serper_api_key: Option<String>,
    #[serde(default)]
    pub serpapi_api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_serper_url")]
    pub serper_url: String,
    #[serde(default = "default_arxiv_url")]
    pub arxiv_url: String,
    #[serde(default = "default_serpapi_url")]
    pub serpapi_url: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            serper_api_key: None,
            serpapi_api_key: None,
            max_results: default_max_results(),
            serper_url: default_serper_url(),
            arxiv_url: default_arxiv_url(),
            serpapi_url: default_serpapi_url(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub ollama: OllamaSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Read the environment once. Agents copy what they need at construction.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            ollama: load_section(OLLAMA_PREFIX, false)?,
            search: load_section(SCHOLAR_PREFIX, true)?,
        })
    }
}

fn load_section<T: serde::de::DeserializeOwned>(
    prefix: &str,
    try_parsing: bool,
) -> Result<T, ConfigError> {
    let config = Config::builder()
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .try_parsing(try_parsing),
        )
        .build()?;

    config.try_deserialize().map_err(|err| {
        tracing::debug!("Configuration error: {:?}", &err);
        match &err {
            config::ConfigError::NotFound(field) => ConfigError::MissingEnvVar {
                env_var: to_env_var(prefix, field),
            },
            _ => {
                let message = err.to_string();
                match message.strip_prefix("missing field `") {
                    Some(rest) => ConfigError::MissingEnvVar {
                        env_var: to_env_var(prefix, rest.trim_end_matches('`')),
                    },
                    None => ConfigError::Other(err),
                }
            }
        }
    })
}

/// Fixed per-agent configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub max_retries: u32,
    pub verbose: bool,
    pub server_address: String,
    pub model_name: String,
    pub api_key: String,
}

impl AgentConfig {
    pub fn new(name: &str, max_retries: u32, verbose: bool, settings: &OllamaSettings) -> Self {
        Self {
            name: name.to_string(),
            max_retries,
            verbose,
            server_address: settings.host(),
            model_name: settings.model.clone(),
            api_key: settings.api_key.clone(),
        }
    }
}

pub fn normalize_host(server: &str) -> String {
    let trimmed = server.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/v1")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_serper_url() -> String {
    SERPER_URL.to_string()
}

fn default_arxiv_url() -> String {
    ARXIV_URL.to_string()
}

fn default_serpapi_url() -> String {
    SERPAPI_URL.to_string()
}
