//! # Crawl Session
//!
//! The coordinator of one crawl. A single loop owns the visited set, the
//! pending-work counter and the only receiver of the frontier channel; fetch
//! tasks never touch that state. Each fetch task reports exactly one outcome,
//! so `pending` reaches zero once every dispatched fetch has been accounted
//! for.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::crawler::download::DownloadDispatcher;
use crate::crawler::fetch::{FetchOutcome, Fetcher};
use crate::crawler::{CrawlError, CrawlNode, CrawlReport, CrawlerConfig};

/// Admission decision for one frontier node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Dispatch,
    Duplicate,
    OverBudget,
}

/// Decide whether `url` is fetched; marks it visited when it is
fn admit(visited: &mut HashSet<String>, processed: usize, budget: usize, url: &str) -> Admission {
    if processed >= budget {
        return Admission::OverBudget;
    }
    if !visited.insert(url.to_string()) {
        return Admission::Duplicate;
    }
    Admission::Dispatch
}

/// One crawler configuration with its HTTP client and pools
#[derive(Clone)]
pub struct CrawlSession {
    config: Arc<CrawlerConfig>,
    fetcher: Arc<Fetcher>,
}

impl CrawlSession {
    /// Create a session, building the HTTP client from the configuration
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        let client = config.http_client()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a session around an existing HTTP client
    pub fn with_client(config: CrawlerConfig, client: reqwest::Client) -> Self {
        let downloads = config.download_dir.as_ref().map(|dir| {
            DownloadDispatcher::new(
                dir.clone(),
                config.download_mode.clone(),
                config.download_concurrency,
            )
        });
        let config = Arc::new(config);
        let fetcher = Arc::new(Fetcher::new(client, Arc::clone(&config), downloads));
        Self { config, fetcher }
    }

    /// The session configuration
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Sweep outward from `urls` and return every URL dispatched, in order
    pub async fn breadth_first(&self, urls: &[String]) -> Vec<String> {
        self.sweep(urls).await.visited
    }

    /// Sweep outward from `urls` under the sweep budget
    pub async fn sweep(&self, urls: &[String]) -> CrawlReport {
        let seeds = urls.iter().map(CrawlNode::seed).collect();
        self.run(seeds, self.config.sweep_budget).await
    }

    /// Crawl from relevance-ranked seeds under the seeded budget
    pub async fn crawl_seeded(&self, seeds: Vec<CrawlNode>) -> CrawlReport {
        self.run(seeds, self.config.seeded_budget).await
    }

    #[instrument(skip(self, seeds), fields(seeds = seeds.len()))]
    async fn run(&self, seeds: Vec<CrawlNode>, budget: usize) -> CrawlReport {
        info!(
            "Started new crawl session from {:?}",
            seeds.iter().map(|s| s.url.as_str()).collect::<Vec<_>>()
        );

        let (tx, mut rx) = mpsc::channel(self.config.fetch_concurrency.max(1));
        let mut visited = HashSet::new();
        let mut report = CrawlReport::default();
        let mut downloads = Vec::new();
        let mut processed = 0usize;
        let mut dropped = 0usize;

        // The seed batch counts as one outstanding message.
        let mut pending = 1usize;
        if tx.send(FetchOutcome::Expanded(seeds)).await.is_err() {
            return report;
        }

        while pending > 0 {
            let Some(outcome) = rx.recv().await else {
                break;
            };
            pending -= 1;

            match outcome {
                FetchOutcome::Expanded(batch) => {
                    for node in batch {
                        match admit(&mut visited, processed, budget, &node.url) {
                            Admission::Dispatch => {
                                processed += 1;
                                pending += 1;
                                debug!("Crawled {}/{} URLs", processed, budget);
                                report.visited.push(node.url.clone());
                                self.dispatch(node, tx.clone());
                            }
                            Admission::Duplicate => {}
                            Admission::OverBudget => dropped += 1,
                        }
                    }
                }
                FetchOutcome::Dataset { node, download } => {
                    info!("Found dataset {}", node.url);
                    report.datasets.push(node);
                    downloads.extend(download);
                }
                FetchOutcome::Failed => {}
            }
        }
        drop(tx);

        if dropped > 0 {
            info!("Crawl budget of {} reached, {} links not followed", budget, dropped);
        }
        if !downloads.is_empty() {
            info!("Waiting for {} downloads", downloads.len());
            for result in future::join_all(downloads).await {
                if let Err(e) = result {
                    error!("Download task failed: {}", e);
                }
            }
        }

        info!(
            "Done! Crawled {} URLs, found {} datasets",
            report.visited.len(),
            report.datasets.len()
        );
        report
    }

    /// Spawn the fetch for one admitted node
    ///
    /// The task sends exactly one outcome, including when the fetch panics.
    fn dispatch(&self, node: CrawlNode, tx: mpsc::Sender<FetchOutcome>) {
        let fetcher = Arc::clone(&self.fetcher);
        tokio::spawn(async move {
            let url = node.url.clone();
            let outcome = match AssertUnwindSafe(fetcher.extract(node)).catch_unwind().await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    warn!("Error occurred while crawling {}: {}", url, e);
                    FetchOutcome::Failed
                }
                Err(_) => {
                    error!("Fetch of {} panicked", url);
                    FetchOutcome::Failed
                }
            };
            if tx.send(outcome).await.is_err() {
                debug!("Frontier closed before {} reported", url);
            }
        });
    }
}
