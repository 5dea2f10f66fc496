// src/coordinator.rs
//! Fan-out/fan-in of per-country scrape jobs.

use std::sync::Arc;

use futures::future::join_all;
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge,
};
use once_cell::sync::OnceCell;
use tokio::sync::Semaphore;

use crate::config::SourceTable;
use crate::dedup::DedupSet;
use crate::extract::extract_entries;
use crate::fetch::FetchFeed;
use crate::stats::RunStats;
use crate::types::{Article, EntryOutcome, FeedSource, IngestRun, SkipReason};

/// One-time metrics registration (so series show up on an exporter).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scrape_entries_total", "Entries parsed from feed payloads.");
        describe_counter!(
            "scrape_admitted_total",
            "Entries admitted after normalization and dedup."
        );
        describe_counter!(
            "scrape_dedup_total",
            "Entries dropped by in-run deduplication."
        );
        describe_counter!(
            "scrape_fetch_errors_total",
            "Feed fetch failures (network or status)."
        );
        describe_counter!("scrape_runs_total", "Completed ingestion runs.");
        describe_counter!(
            "store_conflicts_total",
            "Upserts skipped by storage uniqueness."
        );
        describe_histogram!("scrape_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("scrape_last_run_ts", "Unix ts when the last run completed.");
    });
}

struct CountryScrape {
    articles: Vec<Article>,
    sources_failed: usize,
}

/// Run one complete ingestion pass across the source table.
///
/// One job per country, gated by a semaphore of `concurrency` permits.
/// Jobs are independent; a country whose sources are all unreachable is
/// logged and never cancels its siblings. The returned batch is complete
/// only once every job has finished; there is no overall run timeout.
pub async fn run_ingestion(
    sources: SourceTable,
    fetcher: Arc<dyn FetchFeed>,
    concurrency: usize,
) -> IngestRun {
    ensure_metrics_described();

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let dedup = Arc::new(DedupSet::new());
    let sources_total: usize = sources.values().map(Vec::len).sum();

    let mut jobs = Vec::with_capacity(sources.len());
    for (country, feeds) in sources {
        let semaphore = Arc::clone(&semaphore);
        let fetcher = Arc::clone(&fetcher);
        let dedup = Arc::clone(&dedup);
        jobs.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("scrape semaphore closed");
            scrape_country(&country, feeds, fetcher.as_ref(), &dedup).await
        }));
    }

    // Fan-in: accumulate strictly at the join point, in completion order.
    let mut articles = Vec::new();
    let mut sources_failed = 0usize;
    for joined in join_all(jobs).await {
        match joined {
            Ok(job) => {
                sources_failed += job.sources_failed;
                articles.extend(job.articles);
            }
            Err(e) => {
                tracing::error!(error = ?e, "country job panicked");
            }
        }
    }

    let stats = RunStats::from_articles(&articles);

    counter!("scrape_runs_total").increment(1);
    gauge!("scrape_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
    tracing::info!(
        admitted = articles.len(),
        sources_failed,
        sources_total,
        "ingestion run complete"
    );

    IngestRun {
        articles,
        stats,
        sources_failed,
        sources_total,
    }
}

/// Fetch and extract one country's sources sequentially, so the fetcher's
/// inter-request delay paces each endpoint.
async fn scrape_country(
    country: &str,
    feeds: Vec<FeedSource>,
    fetcher: &dyn FetchFeed,
    dedup: &DedupSet,
) -> CountryScrape {
    let mut articles = Vec::new();
    let mut sources_failed = 0usize;

    for feed in feeds {
        let Some(payload) = fetcher.fetch(&feed).await else {
            sources_failed += 1;
            continue;
        };

        let mut admitted = 0usize;
        let mut deduped = 0usize;
        let mut skipped = 0usize;
        for outcome in extract_entries(payload, &feed.name, country, dedup) {
            match outcome {
                EntryOutcome::Admitted(article) => {
                    admitted += 1;
                    articles.push(article);
                }
                EntryOutcome::Skipped(SkipReason::Duplicate) => deduped += 1,
                EntryOutcome::Skipped(_) => skipped += 1,
            }
        }

        counter!("scrape_admitted_total").increment(admitted as u64);
        counter!("scrape_dedup_total").increment(deduped as u64);
        tracing::info!(
            source = %feed.name,
            country = %country,
            admitted,
            deduped,
            skipped,
            "feed extracted"
        );
    }

    if articles.is_empty() {
        tracing::warn!(country = %country, "country produced no admitted articles");
    }

    CountryScrape {
        articles,
        sources_failed,
    }
}
