//! Error types for the newsdesk shell.

use newsdesk_search::SearchError;

/// Top-level error type for the news desk.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// Transport failure or non-success HTTP status.
    #[error("http error: {0}")]
    Http(String),

    /// A remote function reported an error in its response.
    #[error("function {name} failed: {message}")]
    Function {
        /// Function name as invoked.
        name: String,
        /// Error message reported by the function.
        message: String,
    },

    /// Authentication was rejected or no session is available.
    #[error("auth error: {0}")]
    Auth(String),

    /// A response did not follow the expected contract.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the search engine.
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_error_names_the_function() {
        let err = DeskError::Function {
            name: "generate".into(),
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "function generate failed: quota exceeded");
    }

    #[test]
    fn search_errors_pass_through() {
        let err: DeskError = SearchError::Config("suggestion_limit must be greater than 0".into()).into();
        assert_eq!(
            err.to_string(),
            "config error: suggestion_limit must be greater than 0"
        );
    }

    #[test]
    fn io_error_converts() {
        let err: DeskError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
