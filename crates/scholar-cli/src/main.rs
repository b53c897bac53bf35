mod commands;
mod logging;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scholar::agents::manager::DEFAULT_MAX_RETRIES;
use scholar::agents::AgentManager;
use scholar::citations::CitationStyle;
use scholar::config::Settings;
use scholar::pipeline::SearchSource;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chat server address (can also be set via OLLAMA_SERVER environment variable)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Model to use (can also be set via OLLAMA_MODEL environment variable)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Attempts per search request
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Log every request and response
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a text and validate the summary
    Summarize {
        /// Text to summarize
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Write a research article, refine it and validate the result
    Write {
        /// Topic of the article
        topic: String,

        /// Optional outline to follow
        #[arg(short, long)]
        outline: Option<String>,
    },

    /// Search arXiv, Google Scholar or the web
    Search {
        /// One of arxiv, google_scholar or web
        source: SearchSource,

        /// The search query
        query: String,

        /// Also ask the model to drop irrelevant results
        #[arg(long)]
        relevance: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Print a citation for every result (APA or BibTeX)
        #[arg(long)]
        cite: Option<CitationStyle>,

        /// Write the citations to this file
        #[arg(long, requires = "cite")]
        export: Option<PathBuf>,
    },

    /// List the models installed on the chat server
    Models,

    /// Start an interactive session
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        eprintln!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut settings = Settings::new().context("Failed to load settings from the environment")?;
    if let Some(server) = &cli.server {
        settings.ollama.server = server.clone();
    }
    if let Some(model) = &cli.model {
        settings.ollama.model = model.clone();
    }
    tracing::debug!(
        server = %settings.ollama.server,
        model = %settings.ollama.model,
        "settings loaded"
    );

    if let Some(Command::Models) = cli.command {
        return commands::models::handle_models(&settings).await;
    }

    let manager = AgentManager::new(&settings, cli.max_retries, cli.verbose)
        .context("Failed to initialise agents")?;

    match cli.command {
        Some(Command::Summarize { text, file }) => {
            let text = match (text, file) {
                (_, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (Some(text), None) => text,
                (None, None) => anyhow::bail!("Provide the text to summarize or --file"),
            };
            commands::summarize::handle_summarize(&manager, &text).await
        }
        Some(Command::Write { topic, outline }) => {
            commands::article::handle_write(&manager, &topic, outline.as_deref()).await
        }
        Some(Command::Search {
            source,
            query,
            relevance,
            json,
            cite,
            export,
        }) => {
            let options = commands::search::SearchOptions {
                relevance,
                json,
                cite,
                export,
            };
            commands::search::handle_search(&manager, source, &query, &options).await
        }
        Some(Command::Models) => Ok(()),
        Some(Command::Session) | None => commands::session::handle_session(&manager).await,
    }
}
