use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use super::backend::SearchBackend;
use crate::models::search::{Authors, SearchResult};

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").unwrap();
    static ref TRAILING_YEAR: Regex = Regex::new(r",?\s*\b(1[89]\d{2}|20\d{2})\s*$").unwrap();
}

#[derive(Debug, Deserialize)]
struct ScholarResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    #[serde(default)]
    publication_info: Option<PublicationInfo>,
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct PublicationInfo {
    summary: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Resource {
    link: Option<String>,
}

/// Google Scholar through SerpApi's `google_scholar` engine.
pub async fn search(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    query: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    let num = max_results.to_string();
    let response = client
        .get(endpoint)
        .query(&[
            ("engine", "google_scholar"),
            ("q", query),
            ("num", num.as_str()),
            ("api_key", api_key),
        ])
        .send()
        .await?;

    let status = response.status();
    let body: ScholarResponse = response.json().await?;
    if let Some(error) = body.error {
        return Err(anyhow!("Request failed: {}: {}", status, error));
    }
    if !status.is_success() {
        return Err(anyhow!("Request failed: {}", status));
    }

    Ok(body.organic_results.into_iter().map(normalize).collect())
}

fn normalize(item: OrganicResult) -> SearchResult {
    // Prefer a direct full-text link (the eprint) over the publisher page.
    let url = item
        .resources
        .into_iter()
        .find_map(|resource| resource.link)
        .or(item.link);

    let (authors, year, journal) = match item.publication_info {
        Some(info) => {
            let summary = info.summary.unwrap_or_default();
            let segments: Vec<&str> = summary.split(" - ").map(str::trim).collect();

            let authors = if !info.authors.is_empty() {
                Some(Authors::List(info.authors.into_iter().map(|a| a.name).collect()))
            } else {
                segments
                    .first()
                    .filter(|s| !s.is_empty())
                    .map(|s| Authors::Single(s.to_string()))
            };

            let year = YEAR.captures(&summary).map(|c| c[1].to_string());

            let journal = segments
                .get(1)
                .filter(|_| segments.len() > 2)
                .map(|venue| TRAILING_YEAR.replace(venue, "").trim().to_string())
                .filter(|venue| !venue.is_empty());

            (authors, year, journal)
        }
        None => (None, None, None),
    };

    SearchResult {
        title: item.title,
        authors,
        summary: item.snippet,
        url,
        source: Some(SearchBackend::GoogleScholar.source().to_string()),
        year,
        journal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture() -> serde_json::Value {
        json!({
            "search_metadata": { "status": "Success" },
            "organic_results": [
                {
                    "position": 0,
                    "title": "Attention is all you need",
                    "link": "https://proceedings.neurips.cc/paper/7181",
                    "snippet": "The dominant sequence transduction models ...",
                    "publication_info": {
                        "summary": "A Vaswani, N Shazeer, N Parmar… - Advances in neural information processing systems, 2017 - proceedings.neurips.cc",
                        "authors": [
                            { "name": "A Vaswani", "author_id": "oR9sCGYAAAAJ" },
                            { "name": "N Shazeer" }
                        ]
                    },
                    "resources": [
                        { "title": "neurips.cc", "file_format": "PDF", "link": "https://proceedings.neurips.cc/paper/7181.pdf" }
                    ]
                },
                {
                    "position": 1,
                    "title": "Deep learning",
                    "link": "https://www.nature.com/articles/nature14539",
                    "publication_info": {
                        "summary": "Y LeCun, Y Bengio, G Hinton - nature, 2015 - nature.com"
                    }
                },
                {
                    "position": 2,
                    "title": "Untitled citation"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_normalizes_scholar_results() -> Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("engine", "google_scholar"))
            .and(query_param("q", "attention"))
            .and(query_param("api_key", "serp-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture()))
            .mount(&mock_server)
            .await;

        let results = search(&Client::new(), &mock_server.uri(), "serp-key", "attention", 10).await?;
        assert_eq!(results.len(), 3);

        let first = &results[0];
        assert_eq!(first.url.as_deref(), Some("https://proceedings.neurips.cc/paper/7181.pdf"));
        assert_eq!(first.authors_display(), "A Vaswani, N Shazeer");
        assert_eq!(first.year.as_deref(), Some("2017"));
        assert_eq!(
            first.journal.as_deref(),
            Some("Advances in neural information processing systems")
        );
        assert_eq!(first.source.as_deref(), Some("scholar"));

        let second = &results[1];
        assert_eq!(second.url.as_deref(), Some("https://www.nature.com/articles/nature14539"));
        assert_eq!(
            second.authors,
            Some(Authors::Single("Y LeCun, Y Bengio, G Hinton".to_string()))
        );
        assert_eq!(second.journal.as_deref(), Some("nature"));
        assert!(second.summary.is_none());

        let third = &results[2];
        assert!(third.url.is_none());
        assert!(third.authors.is_none());
        assert!(third.year.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key." })),
            )
            .mount(&mock_server)
            .await;

        let err = search(&Client::new(), &mock_server.uri(), "bad", "q", 10)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid API key."));
        assert!(err.to_string().contains("401"));
    }
}
