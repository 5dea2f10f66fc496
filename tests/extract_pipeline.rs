// tests/extract_pipeline.rs
use std::collections::HashSet;

use global_news_ingest::dedup::DedupSet;
use global_news_ingest::extract::{extract_entries, parse_feed};
use global_news_ingest::types::{EntryOutcome, FeedHealth, SkipReason};

const UK_FEED: &str = include_str!("fixtures/uk_newswire.xml");

fn admitted(outcomes: &[EntryOutcome]) -> Vec<&global_news_ingest::Article> {
    outcomes
        .iter()
        .filter_map(|o| match o {
            EntryOutcome::Admitted(a) => Some(a),
            EntryOutcome::Skipped(_) => None,
        })
        .collect()
}

#[test]
fn fixture_feed_extracts_clean_unique_articles() {
    let dedup = DedupSet::new();
    let payload = parse_feed(UK_FEED, "UK Newswire");
    assert_eq!(payload.health, FeedHealth::WellFormed);
    assert_eq!(payload.entries.len(), 5);

    let outcomes = extract_entries(payload, "UK Newswire", "United Kingdom", &dedup);
    let articles = admitted(&outcomes);

    // 5 entries: one linkless, one exact duplicate of the lead story.
    assert_eq!(articles.len(), 3);

    // No two admitted articles share a fingerprint.
    let fingerprints: HashSet<&str> = articles.iter().map(|a| a.fingerprint.as_str()).collect();
    assert_eq!(fingerprints.len(), articles.len());

    // The linkless entry is never present, whatever its other fields held.
    assert!(articles.iter().all(|a| !a.url.is_empty()));
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, EntryOutcome::Skipped(SkipReason::EmptyLink))));
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, EntryOutcome::Skipped(SkipReason::Duplicate))));
}

#[test]
fn markup_and_whitespace_are_normalized_on_the_way_in() {
    let dedup = DedupSet::new();
    let payload = parse_feed(UK_FEED, "UK Newswire");
    let outcomes = extract_entries(payload, "UK Newswire", "United Kingdom", &dedup);
    let articles = admitted(&outcomes);

    let storm = articles
        .iter()
        .find(|a| a.url.ends_with("/weather/storm"))
        .expect("storm article admitted");
    assert_eq!(storm.title, "Storm closes rail lines...");
    assert_eq!(
        storm.summary,
        "Engineers expect services to resume by Wednesday morning."
    );
    assert_eq!(storm.publication_date, "2025-01-02 11:30:00");
    assert_eq!(storm.country, "United Kingdom");
    assert_eq!(storm.source, "UK Newswire");
    assert_eq!(storm.category, "general");
}

#[test]
fn admitted_articles_are_tagged_with_a_language() {
    let dedup = DedupSet::new();
    let payload = parse_feed(UK_FEED, "UK Newswire");
    let outcomes = extract_entries(payload, "UK Newswire", "United Kingdom", &dedup);

    for article in admitted(&outcomes) {
        assert!(!article.language.is_empty());
    }
}
