// src/extract.rs
//! RSS parsing and candidate-entry extraction.

use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::dates::normalize_date;
use crate::dedup::DedupSet;
use crate::fingerprint::article_fingerprint;
use crate::language::detect_language;
use crate::normalize::clean_text;
use crate::types::{
    Article, CandidateEntry, EntryOutcome, FeedHealth, RawFeedPayload, SkipReason,
    DEFAULT_CATEGORY,
};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Parse one fetched body into candidate entries plus diagnostics.
///
/// A strictly malformed body gets one salvage attempt with bare HTML
/// entities scrubbed; a body that still refuses to parse yields an empty
/// `Unparseable` payload rather than an error, and the source simply
/// contributes nothing this run.
pub fn parse_feed(body: &str, source: &str) -> RawFeedPayload {
    let t0 = std::time::Instant::now();

    let payload = match from_str::<Rss>(body) {
        Ok(rss) => RawFeedPayload {
            entries: to_candidates(rss),
            health: FeedHealth::WellFormed,
        },
        Err(first_err) => {
            let scrubbed = scrub_bare_entities(body);
            match from_str::<Rss>(&scrubbed) {
                Ok(rss) => {
                    tracing::warn!(
                        source = %source,
                        error = ?first_err,
                        "feed parsed only after entity scrubbing"
                    );
                    RawFeedPayload {
                        entries: to_candidates(rss),
                        health: FeedHealth::Recovered,
                    }
                }
                Err(e) => {
                    tracing::warn!(source = %source, error = ?e, "unparseable feed payload");
                    RawFeedPayload {
                        entries: Vec::new(),
                        health: FeedHealth::Unparseable,
                    }
                }
            }
        }
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("scrape_parse_ms").record(ms);
    counter!("scrape_entries_total").increment(payload.entries.len() as u64);

    payload
}

fn to_candidates(rss: Rss) -> Vec<CandidateEntry> {
    rss.channel
        .item
        .into_iter()
        .map(|it| CandidateEntry {
            title: it.title,
            link: it.link,
            published: it.pub_date,
            summary: it.description,
        })
        .collect()
}

/// Bare HTML entities are what loose feeds most often get wrong inside
/// otherwise-valid XML; the salvage parse runs on this scrubbed copy.
fn scrub_bare_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Convert a parsed payload into per-entry outcomes for one source.
///
/// An entry with an empty title or link after normalization is skipped;
/// no partial records are ever emitted. A fingerprint already seen in
/// this run is skipped as a duplicate. One bad entry never aborts its
/// siblings.
pub fn extract_entries(
    payload: RawFeedPayload,
    source: &str,
    country: &str,
    dedup: &DedupSet,
) -> Vec<EntryOutcome> {
    let mut out = Vec::with_capacity(payload.entries.len());
    for entry in payload.entries {
        out.push(extract_one(entry, source, country, dedup));
    }
    out
}

fn extract_one(
    entry: CandidateEntry,
    source: &str,
    country: &str,
    dedup: &DedupSet,
) -> EntryOutcome {
    let title = clean_text(entry.title.as_deref().unwrap_or_default());
    if title.is_empty() {
        return EntryOutcome::Skipped(SkipReason::EmptyTitle);
    }

    let url = entry.link.as_deref().unwrap_or_default().trim().to_string();
    if url.is_empty() {
        return EntryOutcome::Skipped(SkipReason::EmptyLink);
    }

    let summary = clean_text(entry.summary.as_deref().unwrap_or_default());
    let publication_date = normalize_date(entry.published.as_deref());
    let language = detect_language(&format!("{title} {summary}"));
    let fingerprint = article_fingerprint(&title, &url, &publication_date);

    if !dedup.check_and_add(&fingerprint) {
        return EntryOutcome::Skipped(SkipReason::Duplicate);
    }

    EntryOutcome::Admitted(Article {
        title,
        publication_date,
        source: source.to_string(),
        country: country.to_string(),
        summary,
        url,
        language,
        category: DEFAULT_CATEGORY.to_string(),
        fingerprint,
    })
}
