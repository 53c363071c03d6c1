//! HTTP client for the local embedding service

use super::{Embedder, EmbeddingError, EmbeddingResponse, TextPayload, Vector};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Default base URL of the embedding service
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:8000";

/// Default timeout for embedding requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Embedding service client
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Fully resolved `/embed` endpoint
    endpoint: Url,
}

impl HttpEmbedder {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, EmbeddingError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing reqwest client
    pub fn with_client(client: ReqwestClient, base_url: &str) -> Result<Self, EmbeddingError> {
        let endpoint = Url::parse(&format!("{}/embed", base_url.trim_end_matches('/')))?;
        Ok(Self { client, endpoint })
    }

    /// The `/embed` endpoint this client posts to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    #[instrument(skip(self, texts), fields(batch = texts.len()), level = "debug")]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        let payload = TextPayload {
            texts: texts.to_vec(),
        };

        debug!("Sending {} texts to {}", texts.len(), self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Embedding service error: {} - {}", status, body);
            return Err(EmbeddingError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse embedding response: {}", e);
            EmbeddingError::UnexpectedResponse(e.to_string())
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: parsed.embeddings.len(),
            });
        }

        Ok(parsed.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_embed_batch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/embed")
            .match_body(Matcher::Json(serde_json::json!({"texts": ["a", "b"]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embeddings": [[1.0, 2.0], [3.0, 4.0]]}"#)
            .expect(1)
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(&server.url()).unwrap();
        let vectors = embedder
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_embed_one() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/embed")
            .with_status(200)
            .with_body(r#"{"embeddings": [[0.1, 0.2, 0.3]]}"#)
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(&format!("{}/", server.url())).unwrap();
        let vector = embedder.embed_one("elevation").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embed")
            .with_status(503)
            .with_body("model loading")
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(&server.url()).unwrap();
        let result = embedder.embed_batch(&["x".to_string()]).await;
        assert!(matches!(
            result,
            Err(EmbeddingError::Api {
                status_code: 503,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_count_mismatch() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embed")
            .with_status(200)
            .with_body(r#"{"embeddings": [[1.0]]}"#)
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(&server.url()).unwrap();
        let result = embedder
            .embed_batch(&["x".to_string(), "y".to_string()])
            .await;
        assert!(matches!(
            result,
            Err(EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/embed")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let embedder = HttpEmbedder::new(&server.url()).unwrap();
        let result = embedder.embed_one("x").await;
        assert!(matches!(result, Err(EmbeddingError::UnexpectedResponse(_))));
    }
}
