//! Error types for the newsdesk-search crate.
//!
//! Nothing on the search path itself can fail; these errors come from
//! configuration validation and recent-search persistence only.

/// Errors that can occur in the search engine.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Reading or writing persisted recent searches failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("invalid recent-search data: {err}"))
    }
}

/// Convenience type alias for newsdesk-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
