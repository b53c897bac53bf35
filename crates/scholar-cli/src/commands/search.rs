use anyhow::{Context, Result};
use cliclack::spinner;
use std::path::PathBuf;

use crate::render;
use scholar::agents::AgentManager;
use scholar::citations::{CitationStyle, SessionState};
use scholar::models::search::SearchResult;
use scholar::pipeline::{Pipeline, SearchSource};

pub struct SearchOptions {
    pub relevance: bool,
    pub json: bool,
    pub cite: Option<CitationStyle>,
    pub export: Option<PathBuf>,
}

pub async fn handle_search(
    manager: &AgentManager,
    source: SearchSource,
    query: &str,
    options: &SearchOptions,
) -> Result<()> {
    let results = run_search(manager, source, query, options.relevance).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results)?;
    }

    if let Some(style) = options.cite {
        let mut session = SessionState::new();
        for result in &results {
            session.add_citation(result, style);
        }

        render::heading("Citations");
        println!("{}", session.export_string());

        if let Some(path) = &options.export {
            session
                .export(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            cliclack::log::success(format!("Citations written to {}", path.display()))?;
        }
    }
    Ok(())
}

/// Search and validate behind a spinner.
pub async fn run_search(
    manager: &AgentManager,
    source: SearchSource,
    query: &str,
    relevance: bool,
) -> Result<Vec<SearchResult>> {
    let spin = spinner();
    spin.start(format!("Searching {}...", source));
    let results = Pipeline::new(manager)
        .search_and_validate(source, query, relevance)
        .await;
    spin.stop(format!("Searched {}", source));
    Ok(results?)
}

pub fn print_results(results: &[SearchResult]) -> Result<()> {
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for (index, result) in results.iter().enumerate() {
        render::search_result(index, result)?;
    }
    Ok(())
}
