//! Error types for the embedding module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for embedding service calls
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Transport error talking to the embedding service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Embedding service error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },

    /// The response body could not be decoded
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// The service returned a different number of vectors than texts sent
    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch {
        /// Number of texts submitted
        expected: usize,
        /// Number of vectors returned
        actual: usize,
    },

    /// Invalid endpoint configuration
    #[error("Invalid embedding endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl From<EmbeddingError> for CrateError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Http(e) => CrateError::Http(e),
            _ => CrateError::Embedding(err.to_string()),
        }
    }
}
