use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::agents::base::{AgentBase, PromptSpec, RequestOverrides};
use crate::errors::{AgentError, AgentResult};
use crate::models::search::SearchResult;
use crate::providers::base::CompletionOptions;

lazy_static! {
    static ref THINK_BLOCK: Regex = Regex::new(r"(?s)<think>.*?(?:</think>|$)").unwrap();
    static ref VALID_TOKEN: Regex = Regex::new(r"(?i)\bvalid\b").unwrap();
}

pub const RELEVANCE_VALIDATOR_NAME: &str = "RelevanceValidatorAgent";

const RELEVANCE_PROMPT: PromptSpec = PromptSpec {
    system: "You are a research assistant that judges whether a search result is relevant to a query.",
    user_template: "Query: {{ query }}\n\nTitle: {{ title }}\nSummary: {{ summary }}\nURL: {{ url }}\n\nIs this result relevant to the query? Answer with exactly one word: VALID or INVALID.",
};

/// Checks that every result carries a title and a url.
///
/// One malformed entry rejects the whole batch.
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    name: String,
}

impl StructuralValidator {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self, results: Vec<SearchResult>) -> AgentResult<Vec<SearchResult>> {
        if results.is_empty() {
            return Err(AgentError::Validation("No results to validate.".to_string()));
        }
        if let Some(position) = results.iter().position(|r| !r.is_well_formed()) {
            tracing::debug!(validator = %self.name, position, "malformed search result");
            return Err(AgentError::Validation(
                "Invalid result format: Missing title or URL.".to_string(),
            ));
        }
        Ok(results)
    }
}

/// Asks the model for a one-word verdict per result and keeps the relevant ones.
pub struct RelevanceValidator {
    base: AgentBase,
    max_results: usize,
}

impl RelevanceValidator {
    pub fn new(base: AgentBase, max_results: usize) -> Self {
        Self { base, max_results }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Classify results in order, stopping once `max_results` have been kept.
    /// Results after that point are never sent to the model.
    pub async fn validate(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        overrides: &RequestOverrides,
    ) -> AgentResult<Vec<SearchResult>> {
        let mut kept = Vec::new();
        for result in results {
            if kept.len() >= self.max_results {
                break;
            }

            let messages = RELEVANCE_PROMPT.render(&json!({
                "query": query,
                "title": result.title.clone().unwrap_or_default(),
                "summary": result.summary.clone().unwrap_or_default(),
                "url": result.url.clone().unwrap_or_default(),
            }))?;
            let verdict = self
                .base
                .complete(&messages, overrides, &CompletionOptions::verdict())
                .await?;

            if is_valid_verdict(&verdict) {
                kept.push(result);
            } else {
                tracing::debug!(validator = %self.name(), title = ?result.title, %verdict, "dropped result");
            }
        }
        Ok(kept)
    }
}

/// `true` when the reply, minus any `<think>` reasoning, contains the word VALID.
/// An unclosed `<think>` runs to the end of the reply.
pub fn is_valid_verdict(reply: &str) -> bool {
    let answer = THINK_BLOCK.replace_all(reply, "");
    VALID_TOKEN.is_match(&answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, OllamaSettings};
    use crate::providers::mock::{MockChatClient, MockReply};
    use std::sync::Arc;

    fn result(title: Option<&str>, url: Option<&str>) -> SearchResult {
        SearchResult {
            title: title.map(str::to_string),
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    fn relevance(client: Arc<MockChatClient>, max_results: usize) -> RelevanceValidator {
        let config = AgentConfig::new(
            RELEVANCE_VALIDATOR_NAME,
            2,
            false,
            &OllamaSettings::default(),
        );
        RelevanceValidator::new(AgentBase::new(config, client), max_results)
    }

    fn batch(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| result(Some(&format!("Paper {}", i)), Some(&format!("https://x/{}", i))))
            .collect()
    }

    #[test]
    fn test_structural_keeps_well_formed_input() {
        let validator = StructuralValidator::new("WebSearchValidatorAgent");
        let input = vec![result(Some("A"), Some("u1"))];
        assert_eq!(validator.validate(input.clone()).unwrap(), input);
    }

    #[test]
    fn test_structural_fails_fast_on_missing_url() {
        let validator = StructuralValidator::new("WebSearchValidatorAgent");
        let input = vec![result(Some("A"), Some("u1")), result(Some("B"), None)];
        let err = validator.validate(input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Invalid result format: Missing title or URL."
        );
    }

    #[test]
    fn test_structural_rejects_empty_input() {
        let validator = StructuralValidator::new("ArxivValidatorAgent");
        let err = validator.validate(Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: No results to validate.");
    }

    #[test]
    fn test_verdict_parsing() {
        assert!(is_valid_verdict("VALID"));
        assert!(is_valid_verdict("valid."));
        assert!(is_valid_verdict("<think>maybe INVALID?</think>\nVALID"));
        assert!(!is_valid_verdict("INVALID"));
        assert!(!is_valid_verdict("<think>it is valid</think>INVALID"));
        assert!(!is_valid_verdict(""));
    }

    #[test]
    fn test_verdict_cut_off_inside_reasoning() {
        assert!(!is_valid_verdict("<think>\nOkay, so I need to decide if this is valid"));
        assert!(!is_valid_verdict("<think>valid"));
        assert!(is_valid_verdict("<think>done</think>VALID<think>valid"));
    }

    #[tokio::test]
    async fn test_relevance_drops_truncated_reasoning() {
        let client = Arc::new(MockChatClient::always(MockReply::text(
            "<think>\nThe result looks valid because",
        )));
        let kept = relevance(client.clone(), 3)
            .validate("transformers", batch(2), &RequestOverrides::default())
            .await
            .unwrap();

        assert!(kept.is_empty());
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_relevance_all_valid_is_capped() {
        let client = Arc::new(MockChatClient::always(MockReply::text("VALID")));
        let kept = relevance(client.clone(), 3)
            .validate("transformers", batch(5), &RequestOverrides::default())
            .await
            .unwrap();

        assert_eq!(kept, batch(3));
        assert_eq!(client.calls().len(), 3);
        assert_eq!(client.calls()[0].options, CompletionOptions::verdict());
    }

    #[tokio::test]
    async fn test_relevance_all_invalid_is_empty() {
        let client = Arc::new(MockChatClient::always(MockReply::text("INVALID")));
        let kept = relevance(client.clone(), 3)
            .validate("transformers", batch(4), &RequestOverrides::default())
            .await
            .unwrap();

        assert!(kept.is_empty());
        assert_eq!(client.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_relevance_preserves_order_and_stops_early() {
        let client = Arc::new(MockChatClient::new(vec![
            MockReply::text("INVALID"),
            MockReply::text("VALID"),
            MockReply::text("VALID"),
            MockReply::text("VALID"),
        ]));
        let kept = relevance(client.clone(), 2)
            .validate("q", batch(6), &RequestOverrides::default())
            .await
            .unwrap();

        let titles: Vec<_> = kept.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["Paper 1", "Paper 2"]);
        assert_eq!(client.calls().len(), 3);

        let prompt = &client.calls()[0].messages[1].content;
        assert!(prompt.contains("Query: q"));
        assert!(prompt.contains("Title: Paper 0"));
    }
}
