use strum_macros::{Display, EnumIter, EnumString};

/// The external search providers a [`SearchAgent`](super::SearchAgent) can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SearchBackend {
    Arxiv,
    GoogleScholar,
    Serper,
    Tavily,
    #[strum(to_string = "duckduckgo")]
    DuckDuckGo,
}

impl SearchBackend {
    /// Human readable provider name used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            SearchBackend::Arxiv => "arXiv",
            SearchBackend::GoogleScholar => "Google Scholar",
            SearchBackend::Serper => "Serper",
            SearchBackend::Tavily => "Tavily",
            SearchBackend::DuckDuckGo => "DuckDuckGo",
        }
    }

    /// Value written into `SearchResult::source`.
    pub fn source(&self) -> &'static str {
        match self {
            SearchBackend::Arxiv => "arxiv",
            SearchBackend::GoogleScholar => "scholar",
            SearchBackend::Serper | SearchBackend::Tavily | SearchBackend::DuckDuckGo => "web",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, SearchBackend::Arxiv | SearchBackend::DuckDuckGo)
    }

    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            SearchBackend::Arxiv | SearchBackend::GoogleScholar | SearchBackend::Serper
        )
    }
}
