use anyhow::{anyhow, Result};
use bat::WrappingMode;
use console::style;

use scholar::errors::AgentResult;
use scholar::models::search::SearchResult;

/// Print markdown to stdout with syntax highlighting.
pub fn markdown(content: &str) -> Result<()> {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()
        .map_err(|e| anyhow!("Failed to render output: {}", e))?;
    println!();
    Ok(())
}

pub fn heading(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

/// Show a validation verdict. A failed validation is reported but does not
/// hide the output it was judging.
pub fn validation(validation: &AgentResult<String>) -> Result<()> {
    match validation {
        Ok(verdict) => {
            heading("Validation");
            markdown(verdict)
        }
        Err(e) => {
            cliclack::log::warning(format!("Validation did not complete: {}", e))?;
            Ok(())
        }
    }
}

pub fn search_result(index: usize, result: &SearchResult) -> Result<()> {
    let mut text = format!(
        "### {}. {}\n",
        index + 1,
        result.title.as_deref().unwrap_or("(untitled)")
    );

    let authors = result.authors_display();
    if !authors.is_empty() {
        text.push_str(&format!("*{}*", authors));
        if let Some(year) = &result.year {
            text.push_str(&format!(" ({})", year));
        }
        text.push('\n');
    }
    if let Some(journal) = &result.journal {
        text.push_str(&format!("{}\n", journal));
    }
    if let Some(url) = &result.url {
        text.push_str(&format!("<{}>\n", url));
    }
    if let Some(summary) = &result.summary {
        text.push_str(&format!("\n{}\n", summary));
    }

    markdown(&text)
}
