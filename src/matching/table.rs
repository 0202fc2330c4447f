use std::collections::HashMap;

use tracing::debug;

use crate::core::probe::Probe;
use crate::utils::validation::{pack_kmer, MAX_PACKED_WINDOW};

/// Immutable lookup from probe sequence to probe identifier.
///
/// Built once before scanning and read-only afterwards, so it can be shared
/// between scanner threads without locking. Every key has exactly the table's
/// probe length.
#[derive(Debug, Clone)]
pub struct ProbeTable {
    probe_length: usize,

    /// Unique probes, in order of first appearance
    probes: Vec<Probe>,

    /// Sequence bytes to index into `probes`
    by_sequence: HashMap<Box<[u8]>, usize>,

    /// 2-bit packed sequence to index into `probes`; only present when every
    /// key is pure uppercase ACGT and fits in a `u64`
    by_kmer: Option<HashMap<u64, usize>>,

    stats: TableStats,
}

/// Counts collected while building a [`ProbeTable`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Probes offered to the table
    pub total: usize,
    /// Probes dropped because their length differs from the probe length
    pub wrong_length: usize,
    /// Probes whose sequence was already present (identifier overwritten)
    pub duplicates: usize,
}

impl ProbeTable {
    /// Build a table of probes of exactly `probe_length` bases.
    ///
    /// Probes of any other length are discarded. When a sequence appears more
    /// than once the last identifier wins. An empty input gives an empty table.
    pub fn build<I>(probes: I, probe_length: usize) -> Self
    where
        I: IntoIterator<Item = Probe>,
    {
        let mut stats = TableStats::default();
        let mut unique: Vec<Probe> = Vec::new();
        let mut by_sequence: HashMap<Box<[u8]>, usize> = HashMap::new();

        for probe in probes {
            stats.total += 1;
            if probe.len() != probe_length {
                stats.wrong_length += 1;
                continue;
            }

            let key: Box<[u8]> = probe.sequence.as_bytes().into();
            if let Some(&idx) = by_sequence.get(&key) {
                stats.duplicates += 1;
                debug!(
                    "Duplicate probe sequence {}: identifier {} replaces {}",
                    probe.sequence, probe.identifier, unique[idx].identifier
                );
                unique[idx].identifier = probe.identifier;
            } else {
                by_sequence.insert(key, unique.len());
                unique.push(probe);
            }
        }

        let by_kmer = Self::pack(&unique, probe_length);

        debug!(
            "Built probe table: {} unique probes of length {} ({} of wrong length, {} duplicates, packed lookup: {})",
            unique.len(),
            probe_length,
            stats.wrong_length,
            stats.duplicates,
            by_kmer.is_some()
        );

        Self {
            probe_length,
            probes: unique,
            by_sequence,
            by_kmer,
            stats,
        }
    }

    fn pack(probes: &[Probe], probe_length: usize) -> Option<HashMap<u64, usize>> {
        if probe_length == 0 || probe_length > MAX_PACKED_WINDOW {
            return None;
        }
        probes
            .iter()
            .enumerate()
            .map(|(idx, probe)| pack_kmer(probe.sequence.as_bytes()).map(|kmer| (kmer, idx)))
            .collect()
    }

    /// Exact, case-sensitive lookup of a candidate sequence
    #[must_use]
    pub fn lookup(&self, candidate: &str) -> Option<&str> {
        self.lookup_bytes(candidate.as_bytes())
            .map(|probe| probe.identifier.as_str())
    }

    /// Exact lookup of a candidate window, returning the whole probe
    #[inline]
    #[must_use]
    pub fn lookup_bytes(&self, candidate: &[u8]) -> Option<&Probe> {
        self.by_sequence
            .get(candidate)
            .map(|&idx| &self.probes[idx])
    }

    /// Lookup by 2-bit packed k-mer; `None` if the table has no packed index
    #[inline]
    pub(crate) fn lookup_kmer(&self, kmer: u64) -> Option<&Probe> {
        self.by_kmer
            .as_ref()
            .and_then(|index| index.get(&kmer))
            .map(|&idx| &self.probes[idx])
    }

    pub(crate) fn has_packed_index(&self) -> bool {
        self.by_kmer.is_some()
    }

    #[must_use]
    pub fn probe_length(&self) -> usize {
        self.probe_length
    }

    /// Number of unique probe sequences
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> TableStats {
        self.stats
    }

    pub fn probes(&self) -> impl Iterator<Item = &Probe> {
        self.probes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_wrong_length() {
        let probes = vec![
            Probe::new("ACGT", "P1"),
            Probe::new("ACG", "short"),
            Probe::new("ACGTA", "long"),
            Probe::new("TTTT", "P2"),
        ];
        let table = ProbeTable::build(probes, 4);

        assert_eq!(table.len(), 2);
        assert!(table.probes().all(|p| p.len() == 4));
        assert_eq!(table.lookup("ACG"), None);
        assert_eq!(table.lookup("ACGTA"), None);
        assert_eq!(table.stats().wrong_length, 2);
        assert_eq!(table.stats().total, 4);
    }

    #[test]
    fn test_duplicate_sequence_last_write_wins() {
        let probes = vec![
            Probe::new("ACGT", "first"),
            Probe::new("GGGG", "other"),
            Probe::new("ACGT", "second"),
        ];
        let table = ProbeTable::build(probes, 4);

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("ACGT"), Some("second"));
        assert_eq!(table.stats().duplicates, 1);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = ProbeTable::build(vec![Probe::new("ACGT", "P1")], 4);
        assert_eq!(table.lookup("ACGT"), Some("P1"));
        assert_eq!(table.lookup("acgt"), None);
        assert_eq!(table.lookup(" ACGT"), None);
        assert_eq!(table.lookup("ACGT "), None);
    }

    #[test]
    fn test_empty_table() {
        let table = ProbeTable::build(Vec::new(), 25);
        assert!(table.is_empty());
        assert_eq!(table.lookup("ACGT"), None);
    }

    #[test]
    fn test_packed_index_only_for_acgt_probes() {
        let table = ProbeTable::build(vec![Probe::new("ACGT", "P1")], 4);
        assert!(table.has_packed_index());
        assert_eq!(
            table.lookup_kmer(0b00_01_10_11).map(|p| p.identifier.as_str()),
            Some("P1")
        );

        let table = ProbeTable::build(
            vec![Probe::new("ACGT", "P1"), Probe::new("ACNT", "P2")],
            4,
        );
        assert!(!table.has_packed_index());
        assert_eq!(table.lookup("ACNT"), Some("P2"));

        let long = "A".repeat(40);
        let table = ProbeTable::build(vec![Probe::new(long.clone(), "P3")], 40);
        assert!(!table.has_packed_index());
        assert_eq!(table.lookup(&long), Some("P3"));
    }
}
