use reqwest::Client;
use std::future::Future;
use std::time::Duration;

use super::backend::SearchBackend;
use super::{arxiv, scholar, web};
use crate::config::SearchSettings;
use crate::errors::{AgentError, AgentResult};
use crate::models::search::SearchResult;

/// Queries one external backend and normalizes its hits into [`SearchResult`]s.
pub struct SearchAgent {
    name: String,
    backend: SearchBackend,
    api_key: Option<String>,
    endpoint: String,
    max_results: usize,
    max_retries: u32,
    verbose: bool,
    client: Client,
}

impl SearchAgent {
    pub fn new(
        backend: SearchBackend,
        settings: &SearchSettings,
        max_retries: u32,
        verbose: bool,
    ) -> AgentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AgentError::configuration(format!("failed to build HTTP client: {}", e)))?;

        let (name, api_key, endpoint) = match backend {
            SearchBackend::Serper | SearchBackend::Tavily | SearchBackend::DuckDuckGo => (
                "WebSearchAgent",
                settings.serper_api_key.clone(),
                settings.serper_url.clone(),
            ),
            SearchBackend::Arxiv => ("ArxivAgent", None, settings.arxiv_url.clone()),
            SearchBackend::GoogleScholar => (
                "GoogleScholarAgent",
                settings.serpapi_api_key.clone(),
                settings.serpapi_url.clone(),
            ),
        };

        Ok(Self {
            name: name.to_string(),
            backend,
            api_key,
            endpoint,
            max_results: settings.max_results,
            max_retries,
            verbose,
            client,
        })
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> SearchBackend {
        self.backend
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Run `query` against the configured backend, returning at most
    /// `max_results` hits in backend order.
    pub async fn search(&self, query: &str) -> AgentResult<Vec<SearchResult>> {
        let mut results = match self.backend {
            SearchBackend::Serper => {
                let api_key = self.require_api_key()?;
                self.with_retries(|| {
                    web::search(&self.client, &self.endpoint, api_key, query, self.max_results)
                })
                .await?
            }
            SearchBackend::Arxiv => {
                self.with_retries(|| {
                    arxiv::search(&self.client, &self.endpoint, query, self.max_results)
                })
                .await?
            }
            SearchBackend::GoogleScholar => {
                let api_key = self.require_api_key()?;
                self.with_retries(|| {
                    scholar::search(&self.client, &self.endpoint, api_key, query, self.max_results)
                })
                .await?
            }
            SearchBackend::Tavily | SearchBackend::DuckDuckGo => {
                return Err(AgentError::NotImplemented(self.backend.to_string()))
            }
        };

        results.truncate(self.max_results);

        if self.verbose {
            tracing::info!(agent = %self.name, query, count = results.len(), "search results");
        }
        Ok(results)
    }

    fn require_api_key(&self) -> AgentResult<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AgentError::configuration(format!(
                "{} API key required.",
                self.backend.label()
            ))),
        }
    }

    /// Try the request up to `max_retries` times (at least once) with no
    /// backoff; the last failure is returned.
    async fn with_retries<F, Fut>(&self, mut attempt: F) -> AgentResult<Vec<SearchResult>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<SearchResult>>>,
    {
        let attempts = self.max_retries.max(1);
        let mut tried = 0;
        loop {
            tried += 1;
            match attempt().await {
                Ok(results) => return Ok(results),
                Err(e) if tried < attempts => {
                    if self.verbose {
                        tracing::warn!(agent = %self.name, "Attempt {} failed: {}", tried, e);
                    }
                }
                Err(e) => {
                    if self.verbose {
                        tracing::error!(agent = %self.name, "Attempt {} failed: {}", tried, e);
                    }
                    return Err(AgentError::Search {
                        agent: self.name.clone(),
                        backend: self.backend.label().to_string(),
                        cause: e,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer) -> SearchSettings {
        SearchSettings {
            serper_api_key: Some("key".to_string()),
            serper_url: server.uri(),
            arxiv_url: server.uri(),
            serpapi_url: server.uri(),
            ..Default::default()
        }
    }

    fn organic(n: usize) -> serde_json::Value {
        let items: Vec<_> = (0..n)
            .map(|i| json!({ "title": format!("T{}", i), "link": format!("https://x/{}", i) }))
            .collect();
        json!({ "organic": items })
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organic(1)))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut settings = settings(&mock_server);
        settings.serper_api_key = Some("  ".to_string());
        let agent = SearchAgent::new(SearchBackend::Serper, &settings, 2, false).unwrap();

        let err = agent.search("q").await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Configuration error: Serper API key required.");
    }

    #[tokio::test]
    async fn test_unimplemented_backend_names_itself() {
        let agent =
            SearchAgent::new(SearchBackend::Tavily, &SearchSettings::default(), 2, false).unwrap();
        let err = agent.search("q").await.unwrap_err();
        assert!(matches!(err, AgentError::NotImplemented(ref b) if b == "tavily"));
        assert_eq!(err.to_string(), "Backend tavily not implemented.");

        let agent =
            SearchAgent::new(SearchBackend::DuckDuckGo, &SearchSettings::default(), 2, false)
                .unwrap();
        let err = agent.search("q").await.unwrap_err();
        assert_eq!(err.to_string(), "Backend duckduckgo not implemented.");
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organic(2)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let agent =
            SearchAgent::new(SearchBackend::Serper, &settings(&mock_server), 2, false).unwrap();
        let results = agent.search("q").await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let agent =
            SearchAgent::new(SearchBackend::Serper, &settings(&mock_server), 3, false).unwrap();
        let err = agent.search("q").await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::Search { ref agent, ref backend, .. }
                if agent == "WebSearchAgent" && backend == "Serper"
        ));
        assert!(err.to_string().starts_with("[WebSearchAgent] Serper search failed"));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_zero_retries_still_attempts_once() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organic(1)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let agent =
            SearchAgent::new(SearchBackend::Serper, &settings(&mock_server), 0, false).unwrap();
        assert_eq!(agent.search("q").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_results_are_capped() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organic(15)))
            .mount(&mock_server)
            .await;

        let agent = SearchAgent::new(SearchBackend::Serper, &settings(&mock_server), 1, false)
            .unwrap()
            .with_max_results(10);
        let results = agent.search("q").await.unwrap();
        assert_eq!(results.len(), 10);
        assert_eq!(results[9].title.as_deref(), Some("T9"));
    }

    #[tokio::test]
    async fn test_scholar_requires_serpapi_key() {
        let agent = SearchAgent::new(
            SearchBackend::GoogleScholar,
            &SearchSettings::default(),
            2,
            false,
        )
        .unwrap();
        let err = agent.search("q").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Google Scholar API key required."
        );

        let agent = agent.with_api_key("k");
        assert_eq!(agent.require_api_key().unwrap(), "k");
    }
}
