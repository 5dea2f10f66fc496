// src/stats.rs
//! Per-run aggregation of the admitted batch.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::Article;

/// Counts grouped by country, source, and language, each sorted by
/// descending count. Recomputed fresh each run from the in-memory batch;
/// never persisted.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunStats {
    pub total: u64,
    pub by_country: Vec<(String, u64)>,
    pub by_source: Vec<(String, u64)>,
    pub by_language: Vec<(String, u64)>,
}

impl RunStats {
    pub fn from_articles(articles: &[Article]) -> Self {
        let mut by_country: HashMap<&str, u64> = HashMap::new();
        let mut by_source: HashMap<&str, u64> = HashMap::new();
        let mut by_language: HashMap<&str, u64> = HashMap::new();

        for article in articles {
            *by_country.entry(&article.country).or_default() += 1;
            *by_source.entry(&article.source).or_default() += 1;
            *by_language.entry(&article.language).or_default() += 1;
        }

        Self {
            total: articles.len() as u64,
            by_country: sorted_counts(by_country),
            by_source: sorted_counts(by_source),
            by_language: sorted_counts(by_language),
        }
    }
}

// Descending by count; name breaks ties so output is deterministic.
fn sorted_counts(counts: HashMap<&str, u64>) -> Vec<(String, u64)> {
    let mut out: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}
