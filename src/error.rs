//! Error types for the geoharvest crate

use thiserror::Error;

/// Result type for geoharvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for geoharvest operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding service error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Embedding cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Similarity computation error
    #[error("Vector error: {0}")]
    Vector(String),

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
