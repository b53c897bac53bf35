use thiserror::Error;

/// Errors surfaced by agents, search backends and validators.
///
/// Every variant renders to a human readable message; callers are not
/// expected to branch on anything finer than the variant.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend {0} not implemented.")]
    NotImplemented(String),

    #[error("[{agent}] Failed to get response from OpenAI-compatible API: {cause}")]
    Request { agent: String, cause: anyhow::Error },

    #[error("[{agent}] {backend} search failed: {cause}")]
    Search {
        agent: String,
        backend: String,
        cause: anyhow::Error,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("{agent} does not support {operation}")]
    UnsupportedOperation {
        agent: String,
        operation: &'static str,
    },

    #[error("Failed to render prompt: {0}")]
    Prompt(#[from] tera::Error),
}

impl AgentError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AgentError::Configuration(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AgentError::Configuration(_) | AgentError::NotImplemented(_)
        )
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings key back to the environment variable that feeds it.
pub fn to_env_var(prefix: &str, field: &str) -> String {
    format!("{}_{}", prefix, field.replace('.', "_")).to_uppercase()
}
