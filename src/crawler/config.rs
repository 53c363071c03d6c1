//! # Crawler Configuration Module
//!
//! Configuration for crawl sessions: depth bound, crawl budgets, fetch and
//! download concurrency, transport settings and download destination. It uses
//! a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The main configuration struct with crawler parameters
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::crawler::download::DownloadMode;

/// Nodes at this depth are never expanded
pub const DEFAULT_MAX_DEPTH: u32 = 4;

/// Dispatch budget for a plain sweep from explicit URLs
pub const SWEEP_BUDGET: usize = 400;

/// Dispatch budget for a crawl seeded by query relevance
pub const SEEDED_BUDGET: usize = 600;

/// Default width of the fetch and download pools
pub const DEFAULT_CONCURRENCY: usize = 40;

/// Timeout applied to every linked feed fetch
pub const FEED_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Depth bound; children are created only while `depth + 1 < max_depth`
    pub max_depth: u32,

    /// Maximum URLs dispatched by `breadth_first`
    pub sweep_budget: usize,

    /// Maximum URLs dispatched by `crawl_seeded`
    pub seeded_budget: usize,

    /// Concurrent page fetches
    pub fetch_concurrency: usize,

    /// Concurrent downloads, independent of the fetch pool
    pub download_concurrency: usize,

    /// User agent to use for requests
    pub user_agent: String,

    /// Timeout for linked XML feeds
    pub feed_timeout: Duration,

    /// Timeout for page fetches; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,

    /// Directory for downloaded datasets; `None` disables downloading
    pub download_dir: Option<PathBuf>,

    /// How downloaded bytes reach the disk
    pub download_mode: DownloadMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sweep_budget: SWEEP_BUDGET,
            seeded_budget: SEEDED_BUDGET,
            fetch_concurrency: DEFAULT_CONCURRENCY,
            download_concurrency: DEFAULT_CONCURRENCY,
            user_agent: format!("geoharvest/{}", env!("CARGO_PKG_VERSION")),
            feed_timeout: FEED_TIMEOUT,
            request_timeout: None,
            download_dir: None,
            download_mode: DownloadMode::default(),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the depth bound
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the plain sweep budget
    pub fn sweep_budget(mut self, budget: usize) -> Self {
        self.config.sweep_budget = budget;
        self
    }

    /// Set the seeded crawl budget
    pub fn seeded_budget(mut self, budget: usize) -> Self {
        self.config.seeded_budget = budget;
        self
    }

    /// Set the number of concurrent page fetches
    pub fn fetch_concurrency(mut self, permits: usize) -> Self {
        self.config.fetch_concurrency = permits.max(1);
        self
    }

    /// Set the number of concurrent downloads
    pub fn download_concurrency(mut self, permits: usize) -> Self {
        self.config.download_concurrency = permits.max(1);
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the feed fetch timeout
    pub fn feed_timeout(mut self, timeout: Duration) -> Self {
        self.config.feed_timeout = timeout;
        self
    }

    /// Set the page fetch timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Download confirmed datasets into `dir`
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = Some(dir.into());
        self
    }

    /// Set how downloads are written
    pub fn download_mode(mut self, mode: DownloadMode) -> Self {
        self.config.download_mode = mode;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Whether a child of a node at `depth` may be created
    pub fn allows_child_of(&self, depth: u32) -> bool {
        depth + 1 < self.max_depth
    }

    /// HTTP client for page fetches
    pub(crate) fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.sweep_budget, 400);
        assert_eq!(config.seeded_budget, 600);
        assert_eq!(config.fetch_concurrency, 40);
        assert_eq!(config.download_concurrency, 40);
        assert_eq!(config.feed_timeout, Duration::from_secs(5));
        assert!(config.request_timeout.is_none());
        assert!(config.download_dir.is_none());
    }

    #[test]
    fn test_depth_rule() {
        let config = CrawlerConfig::default();
        assert!(config.allows_child_of(0));
        assert!(config.allows_child_of(2));
        assert!(!config.allows_child_of(3));
        assert!(!config.allows_child_of(4));
    }

    #[test]
    fn test_builder() {
        let config = CrawlerConfig::builder()
            .max_depth(2)
            .sweep_budget(10)
            .fetch_concurrency(0)
            .request_timeout(Duration::from_secs(30))
            .download_dir("/tmp/data")
            .download_mode(DownloadMode::Direct)
            .build();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.sweep_budget, 10);
        assert_eq!(config.seeded_budget, 600);
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.download_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(config.download_mode, DownloadMode::Direct);
    }
}
