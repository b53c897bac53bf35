use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::backend::SearchBackend;
use crate::models::search::SearchResult;

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperItem>,
}

#[derive(Debug, Deserialize)]
struct SerperItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl From<SerperItem> for SearchResult {
    fn from(item: SerperItem) -> Self {
        SearchResult {
            title: item.title,
            url: item.link,
            summary: item.snippet,
            source: Some(SearchBackend::Serper.source().to_string()),
            ..Default::default()
        }
    }
}

/// One Serper web search: `POST {endpoint}` with `X-API-KEY` and `{q, num}`.
pub async fn search(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    query: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    let response = client
        .post(endpoint)
        .header("X-API-KEY", api_key)
        .json(&json!({ "q": query, "num": max_results }))
        .send()
        .await?
        .error_for_status()?;

    let body: SerperResponse = response.json().await?;
    Ok(body.organic.into_iter().map(SearchResult::from).collect())
}
