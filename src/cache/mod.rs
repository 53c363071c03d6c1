//! # Embedding Cache Module
//!
//! Persistent mapping from URL to `{description, embedding}` used to rank
//! crawl seeds. The cache is built from the static seed catalog on the first
//! run and grows with every downloadable dataset the crawler discovers.
//!
//! ## Key Components
//!
//! - `EmbeddingCache`: the shared, persisted map and its refresh pipeline
//! - `CacheConfig`: location of the cache file and refresh batch size
//! - `SeedEntry`: one cached URL with its description and vector
//!
//! ## Concurrency
//!
//! Refreshing the cache uses one producer task per candidate and a single
//! consumer task. Producers only test membership; the consumer batches new
//! descriptions, calls the embedding service once per batch and is the only
//! writer. Every access to the map goes through the same mutex because
//! producers read it while the consumer writes.

mod error;

pub use error::CacheError;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{CatalogEntry, SEED_CATALOG};
use crate::crawler::CrawlNode;
use crate::embedding::{Embedder, Vector};

/// Number of descriptions sent per embedding request during refresh
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default location of the persisted cache
pub const DEFAULT_CACHE_PATH: &str = ".geoharvest/embeddings.bin";

/// Configuration for the embedding cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// File the cache is persisted to
    pub path: PathBuf,

    /// Maximum descriptions per embedding request
    pub batch_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CACHE_PATH),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl CacheConfig {
    /// Cache persisted at `path` with the default batch size
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the refresh batch size
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Persisted value stored under each URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEmbedding {
    /// Text that was embedded
    pub description: String,

    /// Vector returned by the embedding service
    pub embedding: Vector,
}

/// A cached URL with its description and vector
#[derive(Debug, Clone, PartialEq)]
pub struct SeedEntry {
    /// Cache key
    pub url: String,

    /// Text that was embedded
    pub description: String,

    /// Vector returned by the embedding service
    pub embedding: Vector,
}

type CacheMap = BTreeMap<String, CachedEmbedding>;

/// Counters describing one refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Candidates already cached or submitted twice
    pub skipped: usize,

    /// New entries written to the cache
    pub embedded: usize,

    /// New candidates lost to failed embedding batches
    pub dropped: usize,

    /// Embedding requests issued
    pub batches: usize,
}

/// A description waiting for its embedding
#[derive(Debug)]
struct Candidate {
    url: String,
    description: String,
}

/// Shared, persisted URL embedding cache
#[derive(Clone)]
pub struct EmbeddingCache {
    config: CacheConfig,
    embedder: Arc<dyn Embedder>,
    entries: Arc<Mutex<CacheMap>>,
}

impl EmbeddingCache {
    /// Load the persisted cache, building it from the seed catalog if absent
    ///
    /// A cache file that exists but cannot be decoded is an error; it is never
    /// rebuilt silently.
    #[instrument(skip(config, embedder), fields(path = %config.path.display()))]
    pub async fn load(config: CacheConfig, embedder: Arc<dyn Embedder>) -> Result<Self, CacheError> {
        Self::load_with_catalog(config, embedder, SEED_CATALOG).await
    }

    /// Like [`EmbeddingCache::load`] with an explicit catalog for the rebuild
    pub async fn load_with_catalog(
        config: CacheConfig,
        embedder: Arc<dyn Embedder>,
        catalog: &[CatalogEntry],
    ) -> Result<Self, CacheError> {
        if !fs::try_exists(&config.path).await? {
            info!(
                "No cache at {}, embedding {} catalog entries",
                config.path.display(),
                catalog.len()
            );
            let entries = build_from_catalog(embedder.as_ref(), catalog).await?;
            let cache = Self::from_entries(config, embedder, entries);
            if let Err(e) = cache.persist().await {
                error!("Failed to persist rebuilt cache: {}", e);
            }
            return Ok(cache);
        }

        let bytes = fs::read(&config.path).await?;
        let entries: CacheMap =
            bincode::deserialize(&bytes).map_err(|source| CacheError::Corrupt {
                path: config.path.clone(),
                source,
            })?;
        info!("Loaded {} cached URL embeddings", entries.len());
        Ok(Self::from_entries(config, embedder, entries))
    }

    fn from_entries(config: CacheConfig, embedder: Arc<dyn Embedder>, entries: CacheMap) -> Self {
        Self {
            config,
            embedder,
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// The cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of cached URLs
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Whether `url` already has an embedding
    pub async fn contains(&self, url: &str) -> bool {
        self.entries.lock().await.contains_key(url)
    }

    /// Look up the cached value for `url`
    pub async fn get(&self, url: &str) -> Option<CachedEmbedding> {
        self.entries.lock().await.get(url).cloned()
    }

    /// Copy of every entry, ordered by URL
    pub async fn snapshot(&self) -> Vec<SeedEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(url, cached)| SeedEntry {
                url: url.clone(),
                description: cached.description.clone(),
                embedding: cached.embedding.clone(),
            })
            .collect()
    }

    /// Embed and store every candidate not yet cached, then persist
    ///
    /// Descriptions are embedded in batches of `batch_size`; a failed batch is
    /// dropped without affecting the others. Persisting is best effort: a
    /// write failure is logged and the in-memory cache stays updated.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn update(&self, candidates: &[CrawlNode]) -> Result<UpdateSummary, CacheError> {
        let batch_size = self.config.batch_size.max(1);
        let (tx, rx) = mpsc::channel::<Candidate>(batch_size);

        let consumer = tokio::spawn(consume(
            rx,
            Arc::clone(&self.entries),
            Arc::clone(&self.embedder),
            batch_size,
        ));

        let producers = candidates
            .iter()
            .map(|node| {
                let tx = tx.clone();
                let entries = Arc::clone(&self.entries);
                let candidate = Candidate {
                    url: node.url.clone(),
                    description: node.embedding_text().to_string(),
                };
                tokio::spawn(async move {
                    let known = entries.lock().await.contains_key(&candidate.url);
                    if known {
                        return false;
                    }
                    tx.send(candidate).await.is_ok()
                })
            })
            .collect::<Vec<_>>();
        drop(tx);

        let mut already_cached = 0;
        for submitted in future::join_all(producers).await {
            if !submitted? {
                already_cached += 1;
            }
        }

        let mut summary = consumer.await?;
        summary.skipped += already_cached;
        info!(
            "Cache refresh: {} embedded, {} dropped, {} skipped in {} batches",
            summary.embedded, summary.dropped, summary.skipped, summary.batches
        );

        if let Err(e) = self.persist().await {
            error!(
                "Failed to write cache to {}: {}",
                self.config.path.display(),
                e
            );
        }
        Ok(summary)
    }

    /// Serialize the whole cache to its file
    ///
    /// The bytes are written to a sibling temporary file which is then renamed
    /// over the cache, so readers never observe a partial write.
    pub async fn persist(&self) -> Result<(), CacheError> {
        let bytes = {
            let entries = self.entries.lock().await;
            bincode::serialize(&*entries).map_err(CacheError::Encode)?
        };

        let path = &self.config.path;
        ensure_parent(path).await?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, path).await?;
        debug!("Persisted {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Embed every catalog description with one batched request
async fn build_from_catalog(
    embedder: &dyn Embedder,
    catalog: &[CatalogEntry],
) -> Result<CacheMap, CacheError> {
    let texts: Vec<String> = catalog
        .iter()
        .map(|entry| entry.description.to_string())
        .collect();
    let vectors = embedder.embed_batch(&texts).await?;

    Ok(catalog
        .iter()
        .zip(vectors)
        .map(|(entry, embedding)| {
            (
                entry.url.to_string(),
                CachedEmbedding {
                    description: entry.description.to_string(),
                    embedding,
                },
            )
        })
        .collect())
}

/// Single consumer: batches candidates and writes their embeddings
async fn consume(
    mut rx: mpsc::Receiver<Candidate>,
    entries: Arc<Mutex<CacheMap>>,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
) -> UpdateSummary {
    let mut summary = UpdateSummary::default();
    let mut queued = HashSet::new();
    let mut batch = Vec::with_capacity(batch_size);

    while let Some(candidate) = rx.recv().await {
        if !queued.insert(candidate.url.clone()) {
            summary.skipped += 1;
            continue;
        }
        batch.push(candidate);
        if batch.len() == batch_size {
            flush(&mut batch, &entries, embedder.as_ref(), &mut summary).await;
        }
    }
    flush(&mut batch, &entries, embedder.as_ref(), &mut summary).await;
    summary
}

async fn flush(
    batch: &mut Vec<Candidate>,
    entries: &Mutex<CacheMap>,
    embedder: &dyn Embedder,
    summary: &mut UpdateSummary,
) {
    if batch.is_empty() {
        return;
    }
    info!("Embedding {} new items", batch.len());
    summary.batches += 1;

    let texts: Vec<String> = batch.iter().map(|c| c.description.clone()).collect();
    let vectors = match embedder.embed_batch(&texts).await {
        Ok(vectors) if vectors.len() == batch.len() => vectors,
        Ok(vectors) => {
            warn!(
                "Embedding batch returned {} vectors for {} texts, dropping batch",
                vectors.len(),
                batch.len()
            );
            summary.dropped += batch.len();
            batch.clear();
            return;
        }
        Err(e) => {
            warn!("Embedding batch failed, dropping {} items: {}", batch.len(), e);
            summary.dropped += batch.len();
            batch.clear();
            return;
        }
    };

    let mut entries = entries.lock().await;
    for (candidate, embedding) in batch.drain(..).zip(vectors) {
        entries.insert(
            candidate.url,
            CachedEmbedding {
                description: candidate.description,
                embedding,
            },
        );
        summary.embedded += 1;
    }
}

async fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
