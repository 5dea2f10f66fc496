// src/fetch.rs
//! Feed retrieval under rate limiting and timeout.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};

use crate::extract::parse_feed;
use crate::types::{FeedSource, RawFeedPayload};

// Browser-like request signature; many endpoints reject unidentified clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT_VALUE: &str = "application/rss+xml, application/xml, text/xml";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Seam between the coordinator and the network. `None` means the source
/// is skipped for this run; the failure has already been logged.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, source: &FeedSource) -> Option<RawFeedPayload>;
}

/// HTTP fetcher with a fixed inter-request delay and per-request timeout.
pub struct FeedFetcher {
    client: reqwest::Client,
    rate_limit: Duration,
}

impl FeedFetcher {
    pub fn new(rate_limit: Duration, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("building feed http client")?;

        Ok(Self { client, rate_limit })
    }
}

#[async_trait]
impl FetchFeed for FeedFetcher {
    async fn fetch(&self, source: &FeedSource) -> Option<RawFeedPayload> {
        // Pace requests so endpoints do not throttle or block us.
        tokio::time::sleep(self.rate_limit).await;

        tracing::info!(source = %source.name, url = %source.url, "fetching feed");

        let resp = match self.client.get(&source.url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, source = %source.name, "feed request failed");
                counter!("scrape_fetch_errors_total").increment(1);
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(
                status = %resp.status(),
                source = %source.name,
                "feed returned non-success status"
            );
            counter!("scrape_fetch_errors_total").increment(1);
            return None;
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = ?e, source = %source.name, "reading feed body failed");
                counter!("scrape_fetch_errors_total").increment(1);
                return None;
            }
        };

        Some(parse_feed(&body, &source.name))
    }
}
