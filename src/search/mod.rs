//! # Dataset Search Module
//!
//! End-to-end search over geospatial data portals: rank cached sources against
//! the query, crawl outward from the best matches, then fold every dataset the
//! crawl confirmed back into the embedding cache so later searches can rank it
//! directly.

mod error;

pub use error::SearchError;

use std::sync::Arc;

use tracing::{info, instrument};

use crate::cache::{CacheConfig, EmbeddingCache, UpdateSummary};
use crate::crawler::{CrawlNode, CrawlReport, CrawlSession, CrawlerConfig};
use crate::embedding::Embedder;
use crate::ranking::{SeedSelector, SelectorConfig};

/// Outcome of one search
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// Seeds chosen for the query, lowest similarity first
    pub seeds: Vec<CrawlNode>,

    /// What the seeded crawl visited and found
    pub report: CrawlReport,

    /// Effect of the crawl on the embedding cache
    pub cache_update: UpdateSummary,
}

impl SearchResults {
    /// URLs of the datasets found
    pub fn urls(&self) -> Vec<String> {
        self.report.urls()
    }
}

/// Search system for geospatial datasets
///
/// Owns all per-run state: the embedding cache, the seed selector and the
/// crawl session.
pub struct SearchSystem {
    cache: EmbeddingCache,
    selector: SeedSelector,
    session: CrawlSession,
}

impl SearchSystem {
    /// Create a search system from its parts
    pub fn new(cache: EmbeddingCache, selector: SeedSelector, session: CrawlSession) -> Self {
        Self {
            cache,
            selector,
            session,
        }
    }

    /// Load the embedding cache and build the selector and crawl session
    pub async fn open(
        embedder: Arc<dyn Embedder>,
        cache_config: CacheConfig,
        selector_config: SelectorConfig,
        crawler_config: CrawlerConfig,
    ) -> Result<Self, SearchError> {
        let cache = EmbeddingCache::load(cache_config, Arc::clone(&embedder)).await?;
        let selector = SeedSelector::new(embedder, selector_config);
        let session = CrawlSession::new(crawler_config)?;
        Ok(Self::new(cache, selector, session))
    }

    /// Run one search
    ///
    /// Fails only when the query is blank, cannot be embedded, or the cache
    /// refresh tasks fail. Crawl errors are logged per URL.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidParameters(
                "search query must not be empty".to_string(),
            ));
        }

        let entries = self.cache.snapshot().await;
        let seeds = self.selector.select(query, &entries).await?;
        let report = self.session.crawl_seeded(seeds.clone()).await;
        let cache_update = self.cache.update(&report.datasets).await?;

        info!(
            "Search for '{}' found {} datasets from {} seeds",
            query,
            report.datasets.len(),
            seeds.len()
        );
        Ok(SearchResults {
            seeds,
            report,
            cache_update,
        })
    }

    /// The embedding cache
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// The crawl session
    pub fn session(&self) -> &CrawlSession {
        &self.session
    }
}
