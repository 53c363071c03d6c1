//! # geoharvest CLI Application
//!
//! Command-line interface for discovering geospatial open data.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `search`: rank cached portals against a query and crawl the best matches
//!   - `crawl`: plain breadth-first sweep from explicit URLs
//!
//! Without `--download` the dataset URLs found are printed; with it, each
//! dataset is written into the directory, through the sandbox helper unless
//! `--nosec` is given.

mod telemetry;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand};
use geoharvest::cache::{CacheConfig, DEFAULT_CACHE_PATH};
use geoharvest::crawler::{
    CrawlSession, CrawlerConfig, CrawlerConfigBuilder, DownloadMode, SEEDED_BUDGET, SWEEP_BUDGET,
};
use geoharvest::embedding::{DEFAULT_EMBEDDING_URL, HttpEmbedder};
use geoharvest::ranking::{DEFAULT_TOP_K, SelectorConfig};
use geoharvest::search::SearchSystem;
use tracing::{info, instrument};

#[derive(Parser)]
#[command(author, version, about = "Discover and harvest geospatial open data", long_about = None)]
struct Cli {
    /// Directory for the crawl log
    #[arg(long, global = true, env = "GEOHARVEST_LOG_DIR", default_value = ".geoharvest/logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search cached data portals and crawl the closest matches
    Search(SearchArgs),

    /// Crawl from explicit URLs without ranking
    Crawl(CrawlArgs),
}

#[derive(Args, Debug)]
struct DownloadArgs {
    /// Directory to download datasets into; URLs are printed when omitted
    #[arg(long)]
    download: Option<PathBuf>,

    /// Write downloads directly instead of through the sandbox helper
    #[arg(long, default_value_t = false)]
    nosec: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Natural-language description of the data wanted
    #[arg(short, long)]
    search: String,

    /// Embedding cache file
    #[arg(long, env = "GEOHARVEST_CACHE", default_value = DEFAULT_CACHE_PATH)]
    cache: PathBuf,

    /// Base URL of the embedding service
    #[arg(long, env = "GEOHARVEST_EMBED_URL", default_value = DEFAULT_EMBEDDING_URL)]
    embed_url: String,

    /// Number of seeds to crawl from
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Maximum number of URLs to fetch
    #[arg(long, default_value_t = SEEDED_BUDGET)]
    budget: usize,

    #[command(flatten)]
    download: DownloadArgs,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URLs to start from
    #[arg(required = true)]
    urls: Vec<String>,

    /// Maximum number of URLs to fetch
    #[arg(long, default_value_t = SWEEP_BUDGET)]
    budget: usize,

    #[command(flatten)]
    download: DownloadArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(&cli.log_dir)?;

    match require_command(cli.command)? {
        Commands::Search(args) => {
            search_command(args).await?;
        }
        Commands::Crawl(args) => {
            crawl_command(args).await?;
        }
    }

    Ok(())
}

/// The subcommand to run; without one, print help and fail
fn require_command(command: Option<Commands>) -> anyhow::Result<Commands> {
    match command {
        Some(command) => Ok(command),
        None => {
            Cli::command().print_help()?;
            Err(anyhow!("A subcommand is required (search or crawl)"))
        }
    }
}

/// Apply the download flags to a crawler config, creating the directory
fn with_downloads(
    builder: CrawlerConfigBuilder,
    args: &DownloadArgs,
) -> anyhow::Result<CrawlerConfigBuilder> {
    let dir = match args.download.as_deref() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => return Ok(builder),
    };
    ensure_dir(dir)?;

    let mode = if args.nosec {
        DownloadMode::Direct
    } else {
        DownloadMode::default()
    };
    Ok(builder.download_dir(dir).download_mode(mode))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download directory {}", dir.display()))
}

#[instrument]
async fn search_command(args: SearchArgs) -> anyhow::Result<()> {
    let query = args.search.trim();
    if query.is_empty() {
        return Err(anyhow!("A search query is required (-s/--search)"));
    }

    let crawler = with_downloads(
        CrawlerConfig::builder().seeded_budget(args.budget),
        &args.download,
    )?
    .build();
    let downloading = crawler.download_dir.is_some();

    let embedder = Arc::new(HttpEmbedder::new(&args.embed_url)?);
    let system = SearchSystem::open(
        embedder,
        CacheConfig::at(&args.cache),
        SelectorConfig { top_k: args.top_k },
        crawler,
    )
    .await?;

    println!("Searching for '{}'...", query);
    let results = system.search(query).await?;

    println!("Closest matches:");
    for seed in results.seeds.iter().rev() {
        println!("  {:.4}  {}", seed.similarity, seed.url);
    }

    if results.report.datasets.is_empty() {
        println!("No datasets found");
    } else if !downloading {
        println!("Found {} datasets:", results.report.datasets.len());
        for url in results.urls() {
            println!("{}", url);
        }
    } else {
        println!("Downloaded {} datasets", results.report.datasets.len());
    }

    info!(
        "Cache refresh embedded {} new entries ({} skipped, {} dropped)",
        results.cache_update.embedded, results.cache_update.skipped, results.cache_update.dropped
    );
    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let crawler = with_downloads(
        CrawlerConfig::builder().sweep_budget(args.budget),
        &args.download,
    )?
    .build();
    let downloading = crawler.download_dir.is_some();

    println!("Crawling {} URLs...", args.urls.len());
    let session = CrawlSession::new(crawler)?;
    let report = session.sweep(&args.urls).await;

    println!(
        "Visited {} URLs, found {} datasets",
        report.visited.len(),
        report.datasets.len()
    );
    if !downloading {
        for url in report.urls() {
            println!("{}", url);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_subcommand_is_an_error() {
        let cli = Cli::try_parse_from(["geoharvest"]).unwrap();
        assert!(require_command(cli.command).is_err());
    }

    #[test]
    fn test_search_requires_query_flag() {
        assert!(Cli::try_parse_from(["geoharvest", "search"]).is_err());
        let cli = Cli::try_parse_from(["geoharvest", "search", "-s", "lidar"]).unwrap();
        assert!(matches!(require_command(cli.command), Ok(Commands::Search(_))));
    }

    #[tokio::test]
    async fn test_blank_query_is_an_error() {
        let cli = Cli::try_parse_from(["geoharvest", "search", "--search", "   "]).unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        let err = search_command(args).await.unwrap_err();
        assert!(err.to_string().contains("search query is required"));
    }

    #[test]
    fn test_uncreatable_download_dir_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let args = DownloadArgs {
            download: Some(file.join("data")),
            nosec: false,
        };
        assert!(with_downloads(CrawlerConfig::builder(), &args).is_err());
    }

    #[test]
    fn test_empty_download_dir_prints_urls() {
        let args = DownloadArgs {
            download: Some(PathBuf::new()),
            nosec: true,
        };
        let config = with_downloads(CrawlerConfig::builder(), &args).unwrap().build();
        assert!(config.download_dir.is_none());
    }
}
