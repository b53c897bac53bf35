use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::base::{require_text, AgentBase, RequestOverrides};
use super::refiner::{self, RefinerAgent};
use super::sanitize_data::{self, SanitizeDataTool};
use super::summarize::{self, SummarizeTool};
use super::validators::{TextValidator, TextValidatorKind};
use super::write_article::{self, WriteArticleTool};
use crate::config::{AgentConfig, Settings};
use crate::errors::{AgentError, AgentResult};
use crate::models::results::AgentOutput;
use crate::models::search::SearchResult;
use crate::providers::base::ChatClient;
use crate::providers::ollama::OllamaClient;
use crate::search::validator::RELEVANCE_VALIDATOR_NAME;
use crate::search::{RelevanceValidator, SearchAgent, SearchBackend, StructuralValidator};

pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Registry keys. The string form is the snake_case variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AgentKind {
    Summarize,
    WriteArticle,
    SanitizeData,
    SummarizeValidator,
    WriteArticleValidator,
    SanitizeDataValidator,
    Refiner,
    Validator,
    WebSearch,
    WebSearchValidator,
    Arxiv,
    ArxivValidator,
    GoogleScholar,
    GoogleScholarValidator,
    RelevanceValidator,
}

/// A registered agent. Each variant supports exactly one of `execute`,
/// `search` or `validate`; calling another returns
/// [`AgentError::UnsupportedOperation`].
pub enum Agent {
    Summarize(SummarizeTool),
    WriteArticle(WriteArticleTool),
    SanitizeData(SanitizeDataTool),
    Refiner(RefinerAgent),
    TextValidator(TextValidator),
    Search(SearchAgent),
    SearchValidator(StructuralValidator),
    RelevanceValidator(RelevanceValidator),
}

impl Agent {
    pub fn name(&self) -> &str {
        match self {
            Agent::Summarize(agent) => agent.name(),
            Agent::WriteArticle(agent) => agent.name(),
            Agent::SanitizeData(agent) => agent.name(),
            Agent::Refiner(agent) => agent.name(),
            Agent::TextValidator(agent) => agent.name(),
            Agent::Search(agent) => agent.name(),
            Agent::SearchValidator(agent) => agent.name(),
            Agent::RelevanceValidator(agent) => agent.name(),
        }
    }

    /// Run a generation or text-validation agent.
    ///
    /// `primary` is the text, topic or original; `secondary` is the outline
    /// for the writer and the text under review for validators.
    pub async fn execute(
        &self,
        primary: &str,
        secondary: Option<&str>,
        overrides: &RequestOverrides,
    ) -> AgentResult<AgentOutput> {
        match self {
            Agent::Summarize(agent) => Ok(agent.execute(primary, overrides).await?.into()),
            Agent::WriteArticle(agent) => {
                Ok(agent.execute(primary, secondary, overrides).await?.into())
            }
            Agent::SanitizeData(agent) => Ok(agent.execute(primary, overrides).await?.into()),
            Agent::Refiner(agent) => Ok(agent.execute(primary, overrides).await?.into()),
            Agent::TextValidator(agent) => {
                let what = match agent.kind() {
                    TextValidatorKind::Summary => "summary",
                    TextValidatorKind::Article | TextValidatorKind::Draft => "article",
                    TextValidatorKind::SanitizedData => "sanitized data",
                };
                let secondary = require_text(secondary, what)?;
                let verdict = agent.execute(primary, secondary, overrides).await?;
                Ok(AgentOutput::Validation(verdict))
            }
            _ => Err(self.unsupported("execute")),
        }
    }

    pub async fn search(&self, query: &str) -> AgentResult<Vec<SearchResult>> {
        match self {
            Agent::Search(agent) => agent.search(query).await,
            _ => Err(self.unsupported("search")),
        }
    }

    /// Filter search results. The structural validators ignore `query`.
    pub async fn validate(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        overrides: &RequestOverrides,
    ) -> AgentResult<Vec<SearchResult>> {
        match self {
            Agent::SearchValidator(validator) => validator.validate(results),
            Agent::RelevanceValidator(validator) => {
                validator.validate(query, results, overrides).await
            }
            _ => Err(self.unsupported("validate")),
        }
    }

    fn unsupported(&self, operation: &'static str) -> AgentError {
        AgentError::UnsupportedOperation {
            agent: self.name().to_string(),
            operation,
        }
    }
}

/// Owns one instance of every agent, built once from shared settings.
pub struct AgentManager {
    agents: HashMap<AgentKind, Agent>,
}

impl AgentManager {
    /// Build the registry against the configured Ollama server.
    pub fn new(settings: &Settings, max_retries: u32, verbose: bool) -> AgentResult<Self> {
        let client = OllamaClient::from_settings(&settings.ollama).map_err(|e| {
            AgentError::configuration(format!("failed to build chat client: {}", e))
        })?;
        Self::with_client(settings, Arc::new(client), max_retries, verbose)
    }

    pub fn with_client(
        settings: &Settings,
        client: Arc<dyn ChatClient>,
        max_retries: u32,
        verbose: bool,
    ) -> AgentResult<Self> {
        let mut agents = HashMap::new();
        for kind in AgentKind::iter() {
            let agent = build_agent(kind, settings, client.clone(), max_retries, verbose)?;
            tracing::debug!(key = %kind, agent = agent.name(), "registered agent");
            agents.insert(kind, agent);
        }
        Ok(Self { agents })
    }

    /// Look an agent up by its registry key.
    pub fn get_agent(&self, key: &str) -> AgentResult<&Agent> {
        let kind = AgentKind::from_str(key)
            .map_err(|_| AgentError::configuration(format!("Agent '{}' not found.", key)))?;
        self.get(kind)
    }

    pub fn get(&self, kind: AgentKind) -> AgentResult<&Agent> {
        self.agents
            .get(&kind)
            .ok_or_else(|| AgentError::configuration(format!("Agent '{}' not found.", kind)))
    }

    pub fn keys(&self) -> Vec<AgentKind> {
        AgentKind::iter()
            .filter(|kind| self.agents.contains_key(kind))
            .collect()
    }
}

fn build_agent(
    kind: AgentKind,
    settings: &Settings,
    client: Arc<dyn ChatClient>,
    max_retries: u32,
    verbose: bool,
) -> AgentResult<Agent> {
    let base = |name: &str| {
        AgentBase::new(
            AgentConfig::new(name, max_retries, verbose, &settings.ollama),
            client.clone(),
        )
    };
    let text_validator =
        |kind: TextValidatorKind| TextValidator::new(base(kind.agent_name()), kind);
    let search = |backend: SearchBackend| {
        SearchAgent::new(backend, &settings.search, max_retries, verbose)
    };

    let agent = match kind {
        AgentKind::Summarize => Agent::Summarize(SummarizeTool::new(base(summarize::NAME))),
        AgentKind::WriteArticle => {
            Agent::WriteArticle(WriteArticleTool::new(base(write_article::NAME)))
        }
        AgentKind::SanitizeData => {
            Agent::SanitizeData(SanitizeDataTool::new(base(sanitize_data::NAME)))
        }
        AgentKind::Refiner => Agent::Refiner(RefinerAgent::new(base(refiner::NAME))),
        AgentKind::SummarizeValidator => {
            Agent::TextValidator(text_validator(TextValidatorKind::Summary))
        }
        AgentKind::WriteArticleValidator => {
            Agent::TextValidator(text_validator(TextValidatorKind::Draft))
        }
        AgentKind::SanitizeDataValidator => {
            Agent::TextValidator(text_validator(TextValidatorKind::SanitizedData))
        }
        AgentKind::Validator => Agent::TextValidator(text_validator(TextValidatorKind::Article)),
        AgentKind::WebSearch => Agent::Search(search(SearchBackend::Serper)?),
        AgentKind::Arxiv => Agent::Search(search(SearchBackend::Arxiv)?),
        AgentKind::GoogleScholar => Agent::Search(search(SearchBackend::GoogleScholar)?),
        AgentKind::WebSearchValidator => {
            Agent::SearchValidator(StructuralValidator::new("WebSearchValidatorAgent"))
        }
        AgentKind::ArxivValidator => {
            Agent::SearchValidator(StructuralValidator::new("ArxivValidatorAgent"))
        }
        AgentKind::GoogleScholarValidator => {
            Agent::SearchValidator(StructuralValidator::new("GoogleScholarValidatorAgent"))
        }
        AgentKind::RelevanceValidator => Agent::RelevanceValidator(RelevanceValidator::new(
            base(RELEVANCE_VALIDATOR_NAME),
            settings.search.max_results,
        )),
    };
    Ok(agent)
}
