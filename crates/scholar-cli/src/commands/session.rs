use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use super::{article, search, summarize};
use crate::render;
use scholar::agents::AgentManager;
use scholar::citations::{CitationStyle, SessionState};
use scholar::models::search::SearchResult;
use scholar::pipeline::SearchSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Summarize,
    Write,
    Sanitize,
    Search(SearchSource),
    Citations,
    Export,
    Quit,
}

/// Interactive loop. Citations collected here live until the session ends.
pub async fn handle_session(manager: &AgentManager) -> Result<()> {
    cliclack::intro(style(" scholar ").on_cyan().black())?;
    let mut session = SessionState::new();

    loop {
        let task = cliclack::select("What would you like to do?")
            .item(Task::Summarize, "Summarize", "summary + validation")
            .item(Task::Write, "Write an article", "draft, refine, validate")
            .item(Task::Sanitize, "Sanitize data", "remove private information")
            .item(Task::Search(SearchSource::Arxiv), "Search arXiv", "")
            .item(Task::Search(SearchSource::GoogleScholar), "Search Google Scholar", "")
            .item(Task::Search(SearchSource::Web), "Search the web", "")
            .item(Task::Citations, "Show citations", "")
            .item(Task::Export, "Export citations", "")
            .item(Task::Quit, "Quit", "")
            .interact()?;

        // A failed task is reported and the session carries on.
        let outcome = match task {
            Task::Summarize => {
                let text: String = cliclack::input("Text to summarize:")
                    .multiline()
                    .interact()?;
                summarize::handle_summarize(manager, &text).await
            }
            Task::Write => {
                let topic: String = cliclack::input("Topic:").interact()?;
                let outline: String = cliclack::input("Outline (optional):")
                    .required(false)
                    .multiline()
                    .interact()?;
                article::handle_write(manager, &topic, Some(outline.as_str())).await
            }
            Task::Sanitize => {
                let data: String = cliclack::input("Data to sanitize:")
                    .multiline()
                    .interact()?;
                article::handle_sanitize(manager, &data).await
            }
            Task::Search(source) => search_and_cite(manager, &mut session, source).await,
            Task::Citations => {
                show_citations(&session);
                Ok(())
            }
            Task::Export => export_citations(&session),
            Task::Quit => break,
        };

        if let Err(e) = outcome {
            cliclack::log::error(format!("{:#}", e))?;
        }
    }

    cliclack::outro("Session ended")?;
    Ok(())
}

async fn search_and_cite(
    manager: &AgentManager,
    session: &mut SessionState,
    source: SearchSource,
) -> Result<()> {
    let query: String = cliclack::input("Query:").interact()?;
    let relevance = cliclack::confirm("Filter results for relevance with the model?")
        .initial_value(false)
        .interact()?;

    let results = search::run_search(manager, source, &query, relevance).await?;
    search::print_results(&results)?;
    if results.is_empty() {
        return Ok(());
    }

    let chosen = cliclack::multiselect("Add citations for:")
        .items(&citation_items(&results))
        .required(false)
        .interact()?;
    if chosen.is_empty() {
        return Ok(());
    }

    let citation_style = cliclack::select("Citation style")
        .item(CitationStyle::Apa, "APA", "")
        .item(CitationStyle::Bibtex, "BibTeX", "")
        .interact()?;

    let added = chosen
        .into_iter()
        .filter(|&index| session.add_citation(&results[index], citation_style))
        .count();
    cliclack::log::success(format!("Added {} citation(s)", added))?;
    Ok(())
}

fn citation_items(results: &[SearchResult]) -> Vec<(usize, String, String)> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            (
                index,
                result.title.clone().unwrap_or_else(|| "(untitled)".to_string()),
                result.authors_display(),
            )
        })
        .collect()
}

fn show_citations(session: &SessionState) {
    if session.is_empty() {
        println!("No citations collected yet.");
        return;
    }
    render::heading("Citations");
    println!("{}", session.export_string());
}

fn export_citations(session: &SessionState) -> Result<()> {
    if session.is_empty() {
        cliclack::log::info("No citations collected yet.")?;
        return Ok(());
    }

    let path: String = cliclack::input("Export to:")
        .default_input("citations.txt")
        .interact()?;
    let path = PathBuf::from(path);
    session
        .export(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    cliclack::log::success(format!("Citations written to {}", path.display()))?;
    Ok(())
}
