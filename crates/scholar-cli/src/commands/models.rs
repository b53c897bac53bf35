use anyhow::{Context, Result};
use console::style;

use scholar::config::Settings;
use scholar::providers::ollama::OllamaClient;

pub async fn handle_models(settings: &Settings) -> Result<()> {
    let client = OllamaClient::from_settings(&settings.ollama)?;
    let models = client
        .list_models(None)
        .await
        .with_context(|| format!("Failed to list models on {}", client.host()))?;

    if models.is_empty() {
        println!("No models installed on {}", client.host());
        return Ok(());
    }

    for model in models {
        if model == settings.ollama.model {
            println!("{} {}", style(&model).green().bold(), style("(default)").dim());
        } else {
            println!("{}", model);
        }
    }
    Ok(())
}
