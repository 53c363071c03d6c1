//! Per-node fetch: request, classify, expand

use std::sync::Arc;

use scraper::Html;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::crawler::classify::{has_dataset_extension, is_boilerplate, is_downloadable};
use crate::crawler::download::DownloadDispatcher;
use crate::crawler::links::discover_links;
use crate::crawler::metadata::{PageMetadata, scan_document};
use crate::crawler::{CrawlError, CrawlNode, CrawlerConfig};

/// Result of fetching one node, reported to the coordinator
#[derive(Debug)]
pub(crate) enum FetchOutcome {
    /// An HTML page and the children discovered on it
    Expanded(Vec<CrawlNode>),
    /// A downloadable dataset, with its download task when downloading
    Dataset {
        node: CrawlNode,
        download: Option<JoinHandle<()>>,
    },
    /// The fetch failed and the node was dropped
    Failed,
}

/// Links and metadata read from one page
struct ParsedPage {
    links: Vec<Url>,
    metadata: Option<PageMetadata>,
}

/// Fetches nodes under the shared fetch limit
pub(crate) struct Fetcher {
    client: reqwest::Client,
    config: Arc<CrawlerConfig>,
    permits: Arc<Semaphore>,
    downloads: Option<DownloadDispatcher>,
}

impl Fetcher {
    pub(crate) fn new(
        client: reqwest::Client,
        config: Arc<CrawlerConfig>,
        downloads: Option<DownloadDispatcher>,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.fetch_concurrency.max(1)));
        Self {
            client,
            config,
            permits,
            downloads,
        }
    }

    /// Fetch one node and classify the response
    ///
    /// The fetch permit is held from the request until the body has been read,
    /// and is released before any download or feed request.
    #[instrument(skip(self, node), fields(url = %node.url, depth = node.depth))]
    pub(crate) async fn extract(&self, node: CrawlNode) -> Result<FetchOutcome, CrawlError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| CrawlError::Other(format!("Failed to acquire fetch permit: {}", e)))?;

        let response = self.client.get(&node.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: node.url.clone(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if is_downloadable(content_type.as_deref(), &node.url) {
            drop(permit);
            debug!("Found dataset {} ({:?})", node.url, content_type);
            let download = self
                .downloads
                .as_ref()
                .map(|dispatcher| dispatcher.spawn(node.url.clone(), response));
            return Ok(FetchOutcome::Dataset { node, download });
        }

        if !self.config.allows_child_of(node.depth) {
            return Ok(FetchOutcome::Expanded(Vec::new()));
        }

        let page_url = response.url().clone();
        let body = response.text().await?;
        drop(permit);

        let ParsedPage { links, metadata } = parse_page(&body, &page_url);
        let metadata = match metadata {
            Some(mut metadata) => {
                metadata
                    .apply_feeds(&self.client, &page_url, self.config.feed_timeout)
                    .await;
                Some(metadata)
            }
            None => None,
        };

        let parent = Arc::new(node);
        let children = links
            .into_iter()
            .map(|link| {
                let child = CrawlNode::child(&parent, link.as_str());
                match metadata.as_ref().filter(|_| has_dataset_extension(link.as_str())) {
                    Some(metadata) => describe(child, metadata),
                    None => child,
                }
            })
            .collect::<Vec<_>>();

        debug!("Discovered {} links on {}", children.len(), page_url);
        Ok(FetchOutcome::Expanded(children))
    }
}

/// Parse a page body into links and, when it links to datasets, metadata
fn parse_page(body: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(body);
    let links = discover_links(&document, page_url, is_boilerplate);
    let metadata = links
        .iter()
        .any(|link| has_dataset_extension(link.as_str()))
        .then(|| scan_document(&document));
    ParsedPage { links, metadata }
}

fn describe(child: CrawlNode, metadata: &PageMetadata) -> CrawlNode {
    match metadata.for_link(&child.url).to_json() {
        Ok(json) => child.with_description(json),
        Err(e) => {
            warn!("Failed to encode metadata for {}: {}", child.url, e);
            child
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::DatasetMetadata;
    use crate::crawler::testing::SlowServer;
    use futures::future;
    use mockito::Server;
    use std::time::Duration;

    fn fetcher(config: CrawlerConfig) -> Fetcher {
        Fetcher::new(reqwest::Client::new(), Arc::new(config), None)
    }

    #[tokio::test]
    async fn test_dataset_response_has_no_children() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/export")
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body("PK")
            .create_async()
            .await;

        let url = format!("{}/export", server.url());
        let outcome = fetcher(CrawlerConfig::default())
            .extract(CrawlNode::seed(&url))
            .await
            .unwrap();
        match outcome {
            FetchOutcome::Dataset { node, download } => {
                assert_eq!(node.url, url);
                assert!(download.is_none());
            }
            other => panic!("expected dataset, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let result = fetcher(CrawlerConfig::default())
            .extract(CrawlNode::seed(format!("{}/missing", server.url())))
            .await;
        assert!(matches!(
            result,
            Err(CrawlError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_page_children_carry_metadata() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/datasets/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(
                r#"<html><head><title>Hydrography</title>
                   <meta name="keywords" content="water, rivers"></head>
                   <body><p>Stream centerlines.</p>
                   <a href="flowlines.shp">shapefile</a>
                   <a href="about.html">about</a></body></html>"#,
            )
            .create_async()
            .await;

        let url = format!("{}/datasets/", server.url());
        let seed = CrawlNode::seed(&url).with_similarity(0.7);
        let outcome = fetcher(CrawlerConfig::default()).extract(seed).await.unwrap();
        let FetchOutcome::Expanded(children) = outcome else {
            panic!("expected expanded page");
        };

        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.depth == 1 && c.similarity == 0.7));
        assert!(children.iter().all(|c| c.parent.as_ref().unwrap().url == url));

        let shapefile = &children[0];
        assert_eq!(shapefile.url, format!("{}flowlines.shp", url));
        let metadata: DatasetMetadata =
            serde_json::from_str(shapefile.description.as_deref().unwrap()).unwrap();
        assert_eq!(metadata.title, "Hydrography");
        assert_eq!(metadata.description, "Stream centerlines.");
        assert_eq!(metadata.keywords, vec!["water", "rivers"]);
        assert_eq!(metadata.url, shapefile.url);

        assert!(children[1].description.is_none());
    }

    #[tokio::test]
    async fn test_fetch_concurrency_is_capped() {
        let server = SlowServer::start("text/html", "<p>leaf</p>", Duration::from_millis(100)).await;
        let fetcher = fetcher(CrawlerConfig::builder().fetch_concurrency(2).build());

        let fetches = (0..6).map(|i| fetcher.extract(CrawlNode::seed(server.url(&format!("/p{i}")))));
        let outcomes = future::join_all(fetches).await;

        assert!(outcomes.iter().all(|outcome| matches!(outcome, Ok(FetchOutcome::Expanded(_)))));
        assert_eq!(server.served(), 6);
        assert!(server.peak() <= 2, "peak of {} fetches in flight", server.peak());
        assert_eq!(server.peak(), 2);
    }

    #[tokio::test]
    async fn test_depth_bound_stops_expansion() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/deep")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<a href="/deeper">deeper</a>"#)
            .create_async()
            .await;

        let mut node = CrawlNode::seed(format!("{}/deep", server.url()));
        node.depth = 3;
        let outcome = fetcher(CrawlerConfig::default()).extract(node).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Expanded(children) if children.is_empty()));
    }
}
