//! # Seed Relevance Ranking Module
//!
//! Turns a natural-language query into a ranked set of crawl seeds. The query
//! is embedded with the embedding service, every cached entry is scored by
//! cosine similarity against it, and the highest scoring entries become the
//! depth-0 nodes of the crawl.
//!
//! ## Key Components
//!
//! - `cosine`: similarity between two vectors, parallel for long vectors
//! - `merge_sort` / `merge`: stable ascending sort by similarity
//! - `SeedSelector`: query embedding, scoring and top-K selection

mod similarity;
mod sort;

pub use similarity::{PARALLEL_THRESHOLD, VectorError, cosine};
pub use sort::{merge, merge_sort};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cache::SeedEntry;
use crate::crawler::CrawlNode;
use crate::embedding::{Embedder, EmbeddingError, Vector};

/// Number of seeds selected for a query
pub const DEFAULT_TOP_K: usize = 10;

/// Configuration for seed selection
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Number of highest scoring entries used as seeds
    pub top_k: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Selects crawl seeds for a query from the embedding cache
#[derive(Clone)]
pub struct SeedSelector {
    embedder: Arc<dyn Embedder>,
    config: SelectorConfig,
}

impl SeedSelector {
    /// Create a selector backed by the given embedder
    pub fn new(embedder: Arc<dyn Embedder>, config: SelectorConfig) -> Self {
        Self { embedder, config }
    }

    /// The selector configuration
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Embed the search query
    ///
    /// No ranking is possible without the query vector, so callers treat an
    /// error here as fatal for the run.
    #[instrument(skip(self))]
    pub async fn embed_query(&self, query: &str) -> Result<Vector, EmbeddingError> {
        self.embedder.embed_one(query).await
    }

    /// Embed `query` and return the best matching cache entries as seeds
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub async fn select(
        &self,
        query: &str,
        entries: &[SeedEntry],
    ) -> Result<Vec<CrawlNode>, EmbeddingError> {
        let query_vector = self.embed_query(query).await?;
        let scored = score_all(entries, &query_vector);
        let seeds = top_k(scored, self.config.top_k);

        info!("Selected {} seeds for '{}'", seeds.len(), query);
        for seed in &seeds {
            info!(
                similarity = seed.similarity,
                "closest match: {} {}",
                seed.url,
                seed.description.as_deref().unwrap_or_default()
            );
        }
        Ok(seeds)
    }
}

/// Score every entry against the query vector
///
/// Entries whose similarity is undefined (zero or mismatched vectors) are
/// logged and left out of the ranking.
pub fn score_all(entries: &[SeedEntry], query: &[f64]) -> Vec<CrawlNode> {
    entries
        .iter()
        .filter_map(|entry| match cosine(query, &entry.embedding) {
            Ok(score) => Some(
                CrawlNode::seed(entry.url.clone())
                    .with_description(entry.description.clone())
                    .with_similarity(score),
            ),
            Err(e) => {
                warn!("Skipping {} from ranking: {}", entry.url, e);
                None
            }
        })
        .collect()
}

/// Keep the `k` highest scoring nodes
///
/// The nodes are merge sorted ascending and the last `k` are returned, still
/// in ascending order. Fewer than `k` nodes are all returned.
pub fn top_k(scored: Vec<CrawlNode>, k: usize) -> Vec<CrawlNode> {
    let mut sorted = merge_sort(scored);
    let start = sorted.len().saturating_sub(k);
    debug!("Keeping {} of {} scored entries", sorted.len() - start, sorted.len());
    sorted.split_off(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedEmbedder(Vector);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
            Ok(texts.iter().map(|_| self.0.clone()).collect())
        }
    }

    fn entry(url: &str, embedding: Vec<f64>) -> SeedEntry {
        SeedEntry {
            url: url.to_string(),
            description: format!("{url} description"),
            embedding,
        }
    }

    #[test]
    fn test_score_all_skips_undefined() {
        let entries = vec![
            entry("same", vec![1.0, 0.0]),
            entry("zero", vec![0.0, 0.0]),
            entry("short", vec![1.0]),
            entry("opposite", vec![-1.0, 0.0]),
        ];
        let scored = score_all(&entries, &[1.0, 0.0]);
        let urls: Vec<_> = scored.iter().map(|n| n.url.as_str()).collect();
        assert_eq!(urls, vec!["same", "opposite"]);
        assert!((scored[0].similarity - 1.0).abs() < 1e-9);
        assert!((scored[1].similarity + 1.0).abs() < 1e-9);
        assert!(scored.iter().all(|n| n.depth == 0 && n.parent.is_none()));
    }

    #[test]
    fn test_top_k_takes_highest() {
        let nodes: Vec<_> = (0..15)
            .map(|i| CrawlNode::seed(format!("u{i}")).with_similarity(i as f64 / 15.0))
            .collect();
        let top = top_k(nodes, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top.first().unwrap().url, "u5");
        assert_eq!(top.last().unwrap().url, "u14");
    }

    #[test]
    fn test_top_k_with_fewer_entries() {
        let nodes = vec![
            CrawlNode::seed("a").with_similarity(0.2),
            CrawlNode::seed("b").with_similarity(0.1),
        ];
        let top = top_k(nodes, 10);
        let urls: Vec<_> = top.iter().map(|n| n.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_select_ranks_by_query() {
        let selector = SeedSelector::new(
            Arc::new(FixedEmbedder(vec![0.0, 1.0])),
            SelectorConfig { top_k: 2 },
        );
        let entries = vec![
            entry("https://a.example", vec![1.0, 0.0]),
            entry("https://b.example", vec![0.1, 1.0]),
            entry("https://c.example", vec![0.5, 0.5]),
        ];
        let seeds = selector.select("hydrography", &entries).await.unwrap();
        let urls: Vec<_> = seeds.iter().map(|n| n.url.as_str()).collect();
        assert_eq!(urls, vec!["https://c.example", "https://b.example"]);
        assert_eq!(
            seeds[1].description.as_deref(),
            Some("https://b.example description")
        );
    }
}
