//! Error types for the embedding cache

use std::path::PathBuf;

use crate::embedding::EmbeddingError;
use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for embedding cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem error while reading or writing the cache
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache could not be encoded
    #[error("Cache encoding error: {0}")]
    Encode(#[source] bincode::Error),

    /// The persisted cache exists but cannot be decoded
    #[error("Corrupt cache at {}: {source}. Delete it to rebuild", path.display())]
    Corrupt {
        /// Location of the unreadable cache
        path: PathBuf,
        /// Decoder failure
        #[source]
        source: bincode::Error,
    },

    /// The embedding service failed while building the cache
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// A cache worker task failed
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl From<CacheError> for CrateError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Io(e) => CrateError::Io(e),
            CacheError::Embedding(e) => e.into(),
            _ => CrateError::Cache(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(format!("Failed to join task: {}", err))
    }
}
