//! # Embedding Service Module
//!
//! Client side of the local text-embedding service. The service itself is an
//! external collaborator: it receives `{"texts": [...]}` on `POST /embed` and
//! answers `{"embeddings": [[...], ...]}` with one vector per text, in order.
//!
//! ## Key Components
//!
//! - `Embedder`: trait implemented by anything able to embed a batch of texts
//! - `HttpEmbedder`: reqwest-backed implementation talking to the service
//! - `EmbeddingError`: failures of the service call

mod client;
mod error;

pub use client::{DEFAULT_EMBEDDING_URL, HttpEmbedder};
pub use error::EmbeddingError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A dense embedding vector
pub type Vector = Vec<f64>;

/// Request body sent to the embedding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPayload {
    /// Texts to embed
    pub texts: Vec<String>,
}

/// Response body returned by the embedding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// One vector per submitted text, in input order
    pub embeddings: Vec<Vector>,
}

/// Anything that can turn a batch of texts into vectors
///
/// Implementations must return exactly one vector per input text, in input
/// order. A batch either succeeds as a whole or fails as a whole.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts with a single service call
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        match vectors.len() {
            1 => Ok(vectors.remove(0)),
            actual => Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = TextPayload {
            texts: vec!["lidar".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"texts":["lidar"]}"#
        );

        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"embeddings": [[0.5, 1.0], [2.0, 3.0]]}"#).unwrap();
        assert_eq!(response.embeddings, vec![vec![0.5, 1.0], vec![2.0, 3.0]]);
    }
}
