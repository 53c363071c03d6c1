//! # Search Error Types Module
//!
//! Errors of the end-to-end search pipeline. Each stage keeps its own error
//! type; `SearchError` only records which stage failed.

use thiserror::Error;

use crate::cache::CacheError;
use crate::crawler::CrawlError;
use crate::embedding::EmbeddingError;
use crate::error::Error as CrateError;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Loading or refreshing the embedding cache failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// The query could not be embedded
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The crawl session could not be created
    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    /// Invalid search parameters
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),
}

impl From<SearchError> for CrateError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Cache(e) => e.into(),
            SearchError::Embedding(e) => e.into(),
            SearchError::Crawl(e) => e.into(),
            SearchError::InvalidParameters(msg) => CrateError::InvalidRequest(msg),
        }
    }
}
