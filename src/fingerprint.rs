// src/fingerprint.rs
//! Content-addressed identity for articles.

use sha2::{Digest, Sha256};

/// Deterministic dedup key over (title, url, publication_date).
///
/// Summary and language are deliberately excluded, so a reworded summary
/// does not mint a new identity. Rendered as 64 lowercase hex chars.
pub fn article_fingerprint(title: &str, url: &str, publication_date: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(publication_date.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
