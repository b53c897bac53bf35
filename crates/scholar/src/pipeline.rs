//! The fixed produce → (refine →) validate sequences offered by the front end.
//!
//! A failing producer aborts the pipeline. A failing final validation is
//! handed back next to the output that was already produced.

use strum_macros::{Display, EnumIter, EnumString};

use crate::agents::{AgentKind, AgentManager, RequestOverrides};
use crate::errors::{AgentError, AgentResult};
use crate::models::search::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SearchSource {
    Arxiv,
    GoogleScholar,
    Web,
}

impl SearchSource {
    pub fn search_kind(&self) -> AgentKind {
        match self {
            SearchSource::Arxiv => AgentKind::Arxiv,
            SearchSource::GoogleScholar => AgentKind::GoogleScholar,
            SearchSource::Web => AgentKind::WebSearch,
        }
    }

    pub fn validator_kind(&self) -> AgentKind {
        match self {
            SearchSource::Arxiv => AgentKind::ArxivValidator,
            SearchSource::GoogleScholar => AgentKind::GoogleScholarValidator,
            SearchSource::Web => AgentKind::WebSearchValidator,
        }
    }
}

#[derive(Debug)]
pub struct SummaryOutcome {
    pub summary: String,
    pub validation: AgentResult<String>,
}

#[derive(Debug)]
pub struct ArticleOutcome {
    pub draft: String,
    pub refined: String,
    pub validation: AgentResult<String>,
}

#[derive(Debug)]
pub struct SanitizeOutcome {
    pub sanitized: String,
    pub validation: AgentResult<String>,
}

/// Runs pipelines against a borrowed [`AgentManager`].
pub struct Pipeline<'a> {
    manager: &'a AgentManager,
    overrides: RequestOverrides,
}

impl<'a> Pipeline<'a> {
    pub fn new(manager: &'a AgentManager) -> Self {
        Self {
            manager,
            overrides: RequestOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: RequestOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// summarize → summarize_validator
    pub async fn summarize_and_validate(&self, text: &str) -> AgentResult<SummaryOutcome> {
        require_non_blank(text, "text")?;

        let summary = self
            .manager
            .get(AgentKind::Summarize)?
            .execute(text, None, &self.overrides)
            .await?
            .into_text();

        let validation = self
            .validate_text(AgentKind::SummarizeValidator, text, &summary)
            .await;

        Ok(SummaryOutcome {
            summary,
            validation,
        })
    }

    /// write_article → refiner → validator
    pub async fn write_refine_validate(
        &self,
        topic: &str,
        outline: Option<&str>,
    ) -> AgentResult<ArticleOutcome> {
        require_non_blank(topic, "topic")?;

        let draft = self
            .manager
            .get(AgentKind::WriteArticle)?
            .execute(topic, outline, &self.overrides)
            .await?
            .into_text();

        let refined = self
            .manager
            .get(AgentKind::Refiner)?
            .execute(&draft, None, &self.overrides)
            .await?
            .into_text();

        let validation = self
            .validate_text(AgentKind::Validator, topic, &refined)
            .await;

        Ok(ArticleOutcome {
            draft,
            refined,
            validation,
        })
    }

    /// sanitize_data → sanitize_data_validator
    pub async fn sanitize_and_validate(&self, data: &str) -> AgentResult<SanitizeOutcome> {
        require_non_blank(data, "data")?;

        let sanitized = self
            .manager
            .get(AgentKind::SanitizeData)?
            .execute(data, None, &self.overrides)
            .await?
            .into_text();

        let validation = self
            .validate_text(AgentKind::SanitizeDataValidator, data, &sanitized)
            .await;

        Ok(SanitizeOutcome {
            sanitized,
            validation,
        })
    }

    /// search → structural validation, optionally followed by relevance
    /// filtering against the same query.
    pub async fn search_and_validate(
        &self,
        source: SearchSource,
        query: &str,
        relevance: bool,
    ) -> AgentResult<Vec<SearchResult>> {
        require_non_blank(query, "query")?;

        let results = self
            .manager
            .get(source.search_kind())?
            .search(query)
            .await?;
        tracing::debug!(%source, count = results.len(), "search returned");

        let validated = self
            .manager
            .get(source.validator_kind())?
            .validate(query, results, &self.overrides)
            .await?;

        if !relevance {
            return Ok(validated);
        }

        self.manager
            .get(AgentKind::RelevanceValidator)?
            .validate(query, validated, &self.overrides)
            .await
    }

    async fn validate_text(
        &self,
        kind: AgentKind,
        primary: &str,
        secondary: &str,
    ) -> AgentResult<String> {
        let output = self
            .manager
            .get(kind)?
            .execute(primary, Some(secondary), &self.overrides)
            .await?;
        Ok(output.into_text())
    }
}

fn require_non_blank(value: &str, what: &str) -> AgentResult<()> {
    if value.trim().is_empty() {
        return Err(AgentError::MissingInput(what.to_string()));
    }
    Ok(())
}
