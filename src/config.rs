// src/config.rs
//! Source-table and runtime-settings loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::types::FeedSource;

const ENV_SOURCES_PATH: &str = "NEWS_SOURCES_PATH";

/// Country name → that country's feed endpoints, in configured order.
/// Ordering within a country is preserved; it drives the sequential fetch
/// order inside one country job.
pub type SourceTable = BTreeMap<String, Vec<FeedSource>>;

// Deserialization shape of one configured endpoint; the country comes
// from the surrounding map key.
#[derive(Debug, Deserialize)]
struct SourceEndpoint {
    name: String,
    url: String,
}

/// Load the source table from an explicit path. Supports TOML or JSON.
pub fn load_sources_from(path: &Path) -> Result<SourceTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading source table from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load the source table using env var + fallbacks:
/// 1) $NEWS_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
pub fn load_sources_default() -> Result<SourceTable> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        }
        return Err(anyhow!("NEWS_SOURCES_PATH points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Err(anyhow!(
        "no source table found (set NEWS_SOURCES_PATH or provide config/sources.toml)"
    ))
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<SourceTable> {
    let raw: BTreeMap<String, Vec<SourceEndpoint>> = if hint_ext == "json" {
        serde_json::from_str(s).context("parsing source table json")?
    } else {
        toml::from_str(s).context("parsing source table toml")?
    };
    if raw.is_empty() {
        return Err(anyhow!("source table has no countries"));
    }

    Ok(raw
        .into_iter()
        .map(|(country, endpoints)| {
            let feeds = endpoints
                .into_iter()
                .map(|e| FeedSource {
                    name: e.name,
                    country: country.clone(),
                    url: e.url,
                })
                .collect();
            (country, feeds)
        })
        .collect())
}

/// Runtime knobs for one ingestion run; env vars override defaults.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub concurrency: usize,
    pub rate_limit: Duration,
    pub timeout: Duration,
    pub database_url: String,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            rate_limit: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
            database_url: "sqlite://news_database.db".to_string(),
        }
    }
}

impl ScraperSettings {
    /// Read `SCRAPE_CONCURRENCY`, `SCRAPE_RATE_LIMIT_MS`,
    /// `SCRAPE_TIMEOUT_SECS`, and `DATABASE_URL`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(v) = env_parse::<usize>("SCRAPE_CONCURRENCY") {
            settings.concurrency = v.max(1);
        }
        if let Some(v) = env_parse::<u64>("SCRAPE_RATE_LIMIT_MS") {
            settings.rate_limit = Duration::from_millis(v);
        }
        if let Some(v) = env_parse::<u64>("SCRAPE_TIMEOUT_SECS") {
            settings.timeout = Duration::from_secs(v);
        }
        if let Ok(v) = std::env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                settings.database_url = v;
            }
        }
        settings
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
