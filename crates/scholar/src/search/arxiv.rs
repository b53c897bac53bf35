use anyhow::Result;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use reqwest::Client;

use super::backend::SearchBackend;
use crate::models::search::{Authors, SearchResult};

lazy_static! {
    static ref ENTRY: Regex = Regex::new(r"(?s)<entry>(.*?)</entry>").unwrap();
    static ref TITLE: Regex = Regex::new(r"(?s)<title[^>]*>(.*?)</title>").unwrap();
    static ref SUMMARY: Regex = Regex::new(r"(?s)<summary[^>]*>(.*?)</summary>").unwrap();
    static ref ID: Regex = Regex::new(r"(?s)<id>(.*?)</id>").unwrap();
    static ref PUBLISHED: Regex = Regex::new(r"<published>(\d{4})").unwrap();
    static ref JOURNAL_REF: Regex =
        Regex::new(r"(?s)<arxiv:journal_ref[^>]*>(.*?)</arxiv:journal_ref>").unwrap();
    static ref AUTHOR_NAME: Regex = Regex::new(r"(?s)<author>\s*<name>(.*?)</name>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref ENTITY: Regex =
        Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|(lt|gt|quot|apos|amp));").unwrap();
}

/// Query the arXiv export API, ordered by relevance.
pub async fn search(
    client: &Client,
    endpoint: &str,
    query: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    let feed = client
        .get(endpoint)
        .query(&[
            ("search_query", format!("all:{}", query)),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "relevance".to_string()),
            ("sortOrder", "descending".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(parse_feed(&feed))
}

/// Parse the Atom feed returned by arXiv into search results.
pub fn parse_feed(feed: &str) -> Vec<SearchResult> {
    ENTRY
        .captures_iter(feed)
        .map(|entry| parse_entry(&entry[1]))
        .collect()
}

fn parse_entry(entry: &str) -> SearchResult {
    let authors: Vec<String> = AUTHOR_NAME
        .captures_iter(entry)
        .map(|c| collapse(&c[1]))
        .collect();

    SearchResult {
        title: capture(&TITLE, entry).map(|t| collapse(&t)),
        authors: Some(Authors::List(authors)),
        summary: capture(&SUMMARY, entry).map(|s| s.trim().to_string()),
        url: capture(&ID, entry).map(|id| id.trim().to_string()),
        source: Some(SearchBackend::Arxiv.source().to_string()),
        year: capture(&PUBLISHED, entry),
        journal: capture(&JOURNAL_REF, entry).map(|j| collapse(&j)),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| unescape(&c[1]))
}

fn collapse(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Decode named and numeric character references in one pass. References
/// that do not name a valid character are left as written.
fn unescape(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else {
                match &caps[3] {
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => Some('&'),
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
