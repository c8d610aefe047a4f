//! Error taxonomy for the scrape pipeline.
//!
//! Each stage has its own error type; [`ScrapeError`] wraps them without
//! losing the classification so callers can tell "no data" from "no match"
//! from "network failure".

/// Fetch stage failures. Never retried by the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid fetcher configuration: {0}")]
    Config(String),
}

/// Extraction stage failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No strategy matched and parsed. `attempted` lists strategies that matched
    /// but failed to parse.
    #[error("No embedded page data found (strategies that matched but failed to parse: {attempted:?})")]
    NotFound { attempted: Vec<&'static str> },
}

/// Resolution stage failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No product matching {url} among {candidates} candidates")]
    NoMatch { url: String, candidates: usize },
}

/// Any pipeline failure.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ScrapeError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ScrapeError::Fetch(_) => "fetch",
            ScrapeError::Extract(_) => "extract",
            ScrapeError::Resolve(_) => "resolve",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ScrapeError::Fetch(_) => "E_FETCH",
            ScrapeError::Extract(ExtractError::NotFound { .. }) => "E_NO_DATA",
            ScrapeError::Resolve(ResolveError::NoMatch { .. }) => "E_NO_MATCH",
        }
    }
}

/// Convenience result type.
pub type ScrapeResult<T> = Result<T, ScrapeError>;
