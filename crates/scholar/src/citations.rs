use std::fs;
use std::io;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

use crate::models::search::SearchResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CitationStyle {
    #[default]
    #[strum(serialize = "APA")]
    Apa,
    #[strum(serialize = "BibTeX")]
    Bibtex,
}

/// The fields a citation is built from. Absent values render as empty
/// strings, except the year which renders as `n.d.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub authors: String,
    pub year: String,
    pub title: String,
    pub journal: String,
    pub url: String,
}

impl From<&SearchResult> for Citation {
    fn from(result: &SearchResult) -> Self {
        Self {
            authors: result.authors_display(),
            year: result.year.clone().unwrap_or_else(|| "n.d.".to_string()),
            title: result.title.clone().unwrap_or_default(),
            journal: result.journal.clone().unwrap_or_default(),
            url: result.url.clone().unwrap_or_default(),
        }
    }
}

impl Citation {
    pub fn format(&self, style: CitationStyle) -> String {
        match style {
            CitationStyle::Apa => format!(
                "{} ({}). {}. {}. {}",
                self.authors, self.year, self.title, self.journal, self.url
            ),
            CitationStyle::Bibtex => format!(
                "@article{{{},\n  title={{ {} }},\n  author={{ {} }},\n  journal={{ {} }},\n  year={{ {} }},\n  url={{ {} }}\n}}",
                self.bibtex_key(),
                self.title,
                self.authors,
                self.journal,
                self.year,
                self.url
            ),
        }
    }

    /// First author's surname followed by the year, restricted to ASCII
    /// alphanumerics so the key survives BibTeX parsing.
    pub fn bibtex_key(&self) -> String {
        let surname = self
            .authors
            .split(',')
            .next()
            .and_then(|first| first.split_whitespace().last())
            .unwrap_or_default();
        let key: String = surname
            .chars()
            .chain(self.year.chars())
            .filter(char::is_ascii_alphanumeric)
            .collect();
        if key.is_empty() {
            "anonymous".to_string()
        } else {
            key
        }
    }
}

pub fn generate_citation(result: &SearchResult, style: CitationStyle) -> String {
    Citation::from(result).format(style)
}

/// Citations collected during one interactive session. Nothing is persisted
/// unless [`SessionState::export`] is called.
#[derive(Debug, Default)]
pub struct SessionState {
    citations: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format and store a citation. Returns `false` when the identical string
    /// was already collected.
    pub fn add_citation(&mut self, result: &SearchResult, style: CitationStyle) -> bool {
        let citation = generate_citation(result, style);
        if self.citations.contains(&citation) {
            return false;
        }
        self.citations.push(citation);
        true
    }

    pub fn citations(&self) -> &[String] {
        &self.citations
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn clear(&mut self) {
        self.citations.clear();
    }

    pub fn export_string(&self) -> String {
        self.citations.join("\n\n")
    }

    pub fn export<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.export_string())
    }
}
