use serde::{Deserialize, Serialize};

/// Authors as reported by a backend: arXiv gives a list of names, Scholar
/// often only an already-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    List(Vec<String>),
    Single(String),
}

impl Authors {
    pub fn joined(&self) -> String {
        match self {
            Authors::List(names) => names.join(", "),
            Authors::Single(name) => name.clone(),
        }
    }
}

/// One normalized search hit. Missing fields stay `None`; nothing is synthesized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "author")]
    pub authors: Option<Authors>,
    #[serde(default, alias = "abstract", alias = "snippet")]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
}

impl SearchResult {
    pub fn authors_display(&self) -> String {
        self.authors
            .as_ref()
            .map(Authors::joined)
            .unwrap_or_default()
    }

    pub fn is_well_formed(&self) -> bool {
        self.title.is_some() && self.url.is_some()
    }
}
