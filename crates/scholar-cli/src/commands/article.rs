use anyhow::Result;
use cliclack::spinner;

use crate::render;
use scholar::agents::AgentManager;
use scholar::pipeline::Pipeline;

pub async fn handle_write(manager: &AgentManager, topic: &str, outline: Option<&str>) -> Result<()> {
    let spin = spinner();
    spin.start("Writing, refining and validating the article...");
    let outcome = Pipeline::new(manager)
        .write_refine_validate(topic, outline)
        .await;
    spin.stop("Article ready");
    let outcome = outcome?;

    render::heading("Draft");
    render::markdown(&outcome.draft)?;
    render::heading("Refined Article");
    render::markdown(&outcome.refined)?;
    render::validation(&outcome.validation)
}

pub async fn handle_sanitize(manager: &AgentManager, data: &str) -> Result<()> {
    let spin = spinner();
    spin.start("Sanitizing...");
    let outcome = Pipeline::new(manager).sanitize_and_validate(data).await;
    spin.stop("Sanitized");
    let outcome = outcome?;

    render::heading("Sanitized Data");
    render::markdown(&outcome.sanitized)?;
    render::validation(&outcome.validation)
}
