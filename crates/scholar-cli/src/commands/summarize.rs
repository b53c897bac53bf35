use anyhow::Result;
use cliclack::spinner;

use crate::render;
use scholar::agents::AgentManager;
use scholar::pipeline::Pipeline;

pub async fn handle_summarize(manager: &AgentManager, text: &str) -> Result<()> {
    let spin = spinner();
    spin.start("Summarizing...");
    let outcome = Pipeline::new(manager).summarize_and_validate(text).await;
    spin.stop("Summary ready");
    let outcome = outcome?;

    render::heading("Summary");
    render::markdown(&outcome.summary)?;
    render::validation(&outcome.validation)
}
