//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("getting {url}: {status}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status
        status: reqwest::StatusCode,
    },

    /// Filesystem error while downloading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The download sandbox failed
    #[error("Sandbox error: {0}")]
    Sandbox(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            CrawlError::Io(e) => CrateError::Io(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_crate_error() {
        let status = CrawlError::Status {
            url: "https://x.example/a".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        match CrateError::from(status) {
            CrateError::Crawl(msg) => assert_eq!(msg, "getting https://x.example/a: 404 Not Found"),
            other => panic!("unexpected {:?}", other),
        }

        let io = CrawlError::from(std::io::Error::other("disk full"));
        assert!(matches!(CrateError::from(io), CrateError::Io(_)));

        let sandbox = CrawlError::Sandbox("firejail exited with 1".to_string());
        assert!(matches!(CrateError::from(sandbox), CrateError::Crawl(_)));
    }
}
