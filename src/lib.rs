//! # geoharvest - Geospatial Open Data Discovery
//!
//! This crate finds downloadable geospatial datasets on the web. Given a
//! natural-language query it ranks a cached catalog of public data portals by
//! embedding similarity, crawls outward from the best matches under bounded
//! concurrency, and records every dataset it confirms so future searches can
//! rank it directly.
//!
//! ## Features
//!
//! - Persistent URL embedding cache with batched refresh
//! - Cosine-similarity seed ranking, parallel for long vectors
//! - Breadth-first crawler with depth, budget and concurrency bounds
//! - Content classification by media type and file extension
//! - Dataset metadata extraction from HTML, JSON-LD and RSS/Atom feeds
//! - Direct or sandboxed dataset downloads
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use geoharvest::cache::CacheConfig;
//! use geoharvest::crawler::CrawlerConfig;
//! use geoharvest::embedding::HttpEmbedder;
//! use geoharvest::ranking::SelectorConfig;
//! use geoharvest::search::SearchSystem;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let embedder = Arc::new(HttpEmbedder::new("http://localhost:8000")?);
//!     let system = SearchSystem::open(
//!         embedder,
//!         CacheConfig::default(),
//!         SelectorConfig::default(),
//!         CrawlerConfig::default(),
//!     )
//!     .await?;
//!
//!     let results = system.search("statewide lidar elevation").await?;
//!     for url in results.urls() {
//!         println!("{}", url);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod cache;
pub mod catalog;
pub mod crawler;
pub mod embedding;
pub mod ranking;
pub mod search;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::cache::{CacheConfig, EmbeddingCache};
    pub use crate::crawler::{CrawlNode, CrawlReport, CrawlSession, CrawlerConfig};
    pub use crate::embedding::{Embedder, HttpEmbedder};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::search::SearchSystem;
}
