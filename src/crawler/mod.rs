//! # Concurrent Crawler Module
//!
//! Breadth-first crawler for geospatial data portals. A crawl starts from a
//! batch of depth-0 nodes, fetches every admitted URL under a bounded fetch
//! pool, classifies the response as a downloadable data file or an HTML page,
//! and expands pages into child nodes until the depth bound or the crawl
//! budget is reached.
//!
//! ## Key Components
//!
//! - `CrawlSession`: per-run coordinator owning the visited set and frontier
//! - `CrawlNode`: one URL in the crawl tree, with its provenance
//! - `CrawlerConfig`: depth, budget, concurrency and download settings
//! - `DownloadDispatcher`: writes confirmed data files to disk
//! - `extract_metadata`: page metadata used as a dataset description

mod classify;
mod config;
mod download;
mod error;
mod fetch;
mod links;
mod metadata;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use classify::{
    BOILERPLATE_MARKERS, DATASET_EXTENSIONS, DATASET_MIME_TYPES, has_dataset_extension,
    is_boilerplate, is_downloadable,
};
pub use config::{
    CrawlerConfig, CrawlerConfigBuilder, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, FEED_TIMEOUT,
    SEEDED_BUDGET, SWEEP_BUDGET,
};
pub use download::{
    DownloadDispatcher, DownloadMode, FALLBACK_FILENAME, SandboxCommand, filename_for, write_bytes,
};
pub use error::CrawlError;
pub use metadata::{DatasetMetadata, PageMetadata, extract_metadata, scan_page};
pub use session::CrawlSession;

use std::sync::Arc;

/// One URL in the crawl tree
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlNode {
    /// Absolute URL of the resource
    pub url: String,

    /// Node whose page linked to this one; `None` for seeds
    pub parent: Option<Arc<CrawlNode>>,

    /// Distance from the seed that led here
    pub depth: u32,

    /// Serialized dataset metadata, when the link looked like a data file
    pub description: Option<String>,

    /// Cosine similarity of the originating seed to the query
    pub similarity: f64,
}

impl CrawlNode {
    /// A depth-0 node with no parent
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            parent: None,
            depth: 0,
            description: None,
            similarity: 0.0,
        }
    }

    /// A node one level below `parent`, inheriting its similarity
    pub fn child(parent: &Arc<CrawlNode>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            parent: Some(Arc::clone(parent)),
            depth: parent.depth + 1,
            description: None,
            similarity: parent.similarity,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the similarity score
    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = similarity;
        self
    }

    /// Text to embed for this node: its description, or the URL without one
    pub fn embedding_text(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => &self.url,
        }
    }

    /// URL of the seed this node was reached from
    pub fn root_url(&self) -> &str {
        let mut node = self;
        while let Some(parent) = node.parent.as_deref() {
            node = parent;
        }
        &node.url
    }
}

/// Outcome of one crawl session
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// URLs dispatched for fetching, in dispatch order
    pub visited: Vec<String>,

    /// Nodes confirmed downloadable by their response headers
    pub datasets: Vec<CrawlNode>,
}

impl CrawlReport {
    /// URLs of the confirmed datasets
    pub fn urls(&self) -> Vec<String> {
        self.datasets.iter().map(|node| node.url.clone()).collect()
    }
}
