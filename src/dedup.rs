// src/dedup.rs
//! Run-scoped fingerprint set shared by concurrent country jobs.

use std::collections::HashSet;
use std::sync::Mutex;

/// Fingerprints already admitted in this run.
///
/// `check_and_add` holds the lock across test-and-insert, so two jobs
/// racing on the same fingerprint can never both see a first sighting.
/// Lifetime is one run; cross-run duplicates are stopped by the storage
/// layer's uniqueness constraints.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: Mutex<HashSet<String>>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically test membership and insert when absent.
    /// Returns whether this was a first sighting.
    pub fn check_and_add(&self, fingerprint: &str) -> bool {
        let mut seen = self.seen.lock().expect("dedup mutex poisoned");
        seen.insert(fingerprint.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().expect("dedup mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_sighting_inserts_second_does_not() {
        let set = DedupSet::new();
        assert!(set.check_and_add("fp-1"));
        assert!(!set.check_and_add("fp-1"));
        assert!(set.check_and_add("fp-2"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn concurrent_overlapping_inserts_admit_each_fingerprint_once() {
        let set = Arc::new(DedupSet::new());
        let fingerprints: Vec<String> = (0..50).map(|i| format!("fp-{i}")).collect();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let set = Arc::clone(&set);
            let fps = fingerprints.clone();
            handles.push(std::thread::spawn(move || {
                fps.iter().filter(|fp| set.check_and_add(fp)).count()
            }));
        }

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, fingerprints.len());
        assert_eq!(set.len(), fingerprints.len());
    }
}
