//! Global news scraper binary entrypoint.
//! Loads the source table, runs one ingestion pass across all countries,
//! persists the admitted batch, and reports run statistics.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use global_news_ingest::config::{self, ScraperSettings};
use global_news_ingest::coordinator::run_ingestion;
use global_news_ingest::fetch::FeedFetcher;
use global_news_ingest::store::ArticleStore;

/// Command-line arguments for one scrape run.
///
/// Every option falls back to its `SCRAPE_*` / `DATABASE_URL` env var
/// (loaded from `.env` when present) and then to a built-in default.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the source table (TOML or JSON); defaults to
    /// $NEWS_SOURCES_PATH, then config/sources.{toml,json}
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database URL, e.g. sqlite://news_database.db
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of concurrent country jobs
    #[arg(long)]
    concurrency: Option<usize>,

    /// Delay between requests within one country job, in milliseconds
    #[arg(long)]
    rate_limit_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut settings = ScraperSettings::from_env();
    if let Some(v) = cli.concurrency {
        settings.concurrency = v.max(1);
    }
    if let Some(v) = cli.rate_limit_ms {
        settings.rate_limit = Duration::from_millis(v);
    }
    if let Some(v) = cli.timeout_secs {
        settings.timeout = Duration::from_secs(v);
    }
    if let Some(v) = cli.database_url {
        settings.database_url = v;
    }

    let sources = match &cli.config {
        Some(path) => config::load_sources_from(path)?,
        None => config::load_sources_default()?,
    };
    let countries = sources.len();
    let endpoints: usize = sources.values().map(Vec::len).sum();
    tracing::info!(countries, endpoints, "source table loaded");

    let store = ArticleStore::connect(&settings.database_url).await?;
    store.init_schema().await?;

    let fetcher = Arc::new(FeedFetcher::new(settings.rate_limit, settings.timeout)?);
    let run = run_ingestion(sources, fetcher, settings.concurrency).await;

    let inserted = store.upsert_batch(&run.articles).await?;
    let stored_total = store.count().await?;

    tracing::info!(
        sources_total = run.sources_total,
        sources_failed = run.sources_failed,
        admitted = run.articles.len(),
        inserted,
        stored_total,
        "scrape run finished"
    );
    for (country, count) in run.stats.by_country.iter().take(10) {
        tracing::info!(country = %country, count, "articles by country");
    }
    for (source, count) in run.stats.by_source.iter().take(10) {
        tracing::info!(source = %source, count, "articles by source");
    }
    for (language, count) in &run.stats.by_language {
        tracing::info!(language = %language, count, "articles by language");
    }

    Ok(())
}
