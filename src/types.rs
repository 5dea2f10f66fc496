// src/types.rs
use serde::{Deserialize, Serialize};

/// Category assigned to every article; feed content is not mined for
/// categories in the current pipeline.
pub const DEFAULT_CATEGORY: &str = "general";

/// One syndication endpoint belonging to exactly one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    pub country: String,
    pub url: String,
}

/// Parse diagnostics attached to one fetched feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedHealth {
    WellFormed,
    /// Parsed only after bare-entity scrubbing.
    Recovered,
    /// Refused to parse even after scrubbing; carries zero entries.
    Unparseable,
}

/// One syndication item before normalization. Discarded after extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
}

/// Candidate entries of one fetched feed plus parse diagnostics.
#[derive(Debug, Clone)]
pub struct RawFeedPayload {
    pub entries: Vec<CandidateEntry>,
    pub health: FeedHealth,
}

/// The persisted unit. Immutable once stored; `ingested_at` is assigned by
/// the storage layer at insert time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub publication_date: String,
    pub source: String,
    pub country: String,
    pub summary: String,
    pub url: String,
    pub language: String,
    pub category: String,
    pub fingerprint: String,
}

/// Why an entry was dropped instead of admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyTitle,
    EmptyLink,
    /// Fingerprint already seen in this run.
    Duplicate,
}

/// Per-entry extraction outcome. Skips carry their reason so tests and
/// logs can tell why an entry never reached the batch.
#[derive(Debug, Clone)]
pub enum EntryOutcome {
    Admitted(Article),
    Skipped(SkipReason),
}

/// Result of one complete ingestion run across all configured sources.
#[derive(Debug, Clone)]
pub struct IngestRun {
    pub articles: Vec<Article>,
    pub stats: crate::stats::RunStats,
    pub sources_failed: usize,
    pub sources_total: usize,
}
