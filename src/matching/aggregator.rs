use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::types::{MatchLocation, ProbeKey};
use crate::matching::scanner::Hit;

/// Locations of one probe sequence, keyed by identifier
type Buckets = HashMap<String, HashMap<String, Vec<MatchLocation>>>;

/// Run-wide accumulator of match locations, keyed by `(sequence, identifier)`.
///
/// Locations are appended in call order and never deduplicated. All buckets
/// sit behind one mutex, so concurrent `record` calls are serialized.
#[derive(Debug, Default)]
pub struct MatchAggregator {
    buckets: Mutex<Buckets>,
}

impl MatchAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one location to the bucket for `(sequence, identifier)`,
    /// creating the bucket on its first hit.
    pub fn record(&self, sequence: &str, identifier: &str, source: &Arc<str>, offset: u64) {
        let location = MatchLocation::new(Arc::clone(source), offset);
        let mut buckets = self.lock();

        if let Some(by_identifier) = buckets.get_mut(sequence) {
            if let Some(locations) = by_identifier.get_mut(identifier) {
                locations.push(location);
            } else {
                by_identifier.insert(identifier.to_string(), vec![location]);
            }
            return;
        }

        buckets.insert(
            sequence.to_string(),
            HashMap::from([(identifier.to_string(), vec![location])]),
        );
    }

    /// Record every hit of one scanned source, in the order given.
    ///
    /// Returns the number of hits recorded.
    pub fn merge<'t, I>(&self, source: &Arc<str>, hits: I) -> usize
    where
        I: IntoIterator<Item = Hit<'t>>,
    {
        let mut count = 0;
        for hit in hits {
            self.record(hit.sequence(), hit.identifier(), source, hit.offset as u64);
            count += 1;
        }
        count
    }

    /// Copy of the current state, ordered by `(sequence, identifier)`
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<ProbeKey, Vec<MatchLocation>> {
        let buckets = self.lock();
        let mut snapshot = BTreeMap::new();
        for (sequence, by_identifier) in buckets.iter() {
            for (identifier, locations) in by_identifier {
                snapshot.insert(ProbeKey::new(sequence, identifier), locations.clone());
            }
        }
        snapshot
    }

    /// Consume the aggregator without copying location lists
    #[must_use]
    pub fn into_snapshot(self) -> BTreeMap<ProbeKey, Vec<MatchLocation>> {
        let buckets = self.buckets.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut snapshot = BTreeMap::new();
        for (sequence, by_identifier) in buckets {
            for (identifier, locations) in by_identifier {
                snapshot.insert(
                    ProbeKey {
                        sequence: sequence.clone(),
                        identifier,
                    },
                    locations,
                );
            }
        }
        snapshot
    }

    /// Number of `(sequence, identifier)` buckets with at least one hit
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all location counts
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.lock()
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> Arc<str> {
        Arc::from(name)
    }

    fn rendered(locations: &[MatchLocation]) -> Vec<String> {
        locations.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_record_keeps_call_order_across_sources() {
        let agg = MatchAggregator::new();
        let chr1 = source("chr1.fa");
        let chr2 = source("chr2.fa");

        agg.record("ACGT", "P1", &chr1, 10);
        agg.record("ACGT", "P1", &chr1, 42);
        agg.record("ACGT", "P1", &chr2, 3);

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.len(), 1);
        let locations = &snapshot[&ProbeKey::new("ACGT", "P1")];
        assert_eq!(rendered(locations), vec!["chr1.fa:10", "chr1.fa:42", "chr2.fa:3"]);
    }

    #[test]
    fn test_no_deduplication() {
        let agg = MatchAggregator::new();
        let chr1 = source("chr1.fa");
        agg.record("ACGT", "P1", &chr1, 5);
        agg.record("ACGT", "P1", &chr1, 5);
        assert_eq!(agg.total_matches(), 2);
    }

    #[test]
    fn test_buckets_by_sequence_and_identifier() {
        let agg = MatchAggregator::new();
        let chr1 = source("chr1.fa");
        agg.record("CCGG", "P2", &chr1, 1);
        agg.record("AATT", "P1", &chr1, 2);
        agg.record("AATT", "P9", &chr1, 3);

        assert_eq!(agg.len(), 3);
        assert_eq!(agg.total_matches(), 3);

        let keys: Vec<ProbeKey> = agg.into_snapshot().into_keys().collect();
        assert_eq!(
            keys,
            vec![
                ProbeKey::new("AATT", "P1"),
                ProbeKey::new("AATT", "P9"),
                ProbeKey::new("CCGG", "P2"),
            ]
        );
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = MatchAggregator::default();
        assert!(agg.is_empty());
        assert_eq!(agg.total_matches(), 0);
        assert!(agg.snapshot().is_empty());
    }

    #[test]
    fn test_concurrent_records_to_same_bucket() {
        let agg = MatchAggregator::new();
        let chr1 = source("chr1.fa");

        std::thread::scope(|s| {
            for t in 0..4u64 {
                let agg = &agg;
                let chr1 = &chr1;
                s.spawn(move || {
                    for i in 0..250 {
                        agg.record("ACGT", "P1", chr1, t * 1000 + i);
                        agg.record("TTTT", "P2", chr1, i);
                    }
                });
            }
        });

        let snapshot = agg.snapshot();
        assert_eq!(snapshot[&ProbeKey::new("ACGT", "P1")].len(), 1000);
        assert_eq!(snapshot[&ProbeKey::new("TTTT", "P2")].len(), 1000);
    }
}
