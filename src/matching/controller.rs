use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::probe::Probe;
use crate::matching::aggregator::MatchAggregator;
use crate::matching::report::{build_report, ReportRow};
use crate::matching::scanner::{scan, Hit};
use crate::matching::table::ProbeTable;
use crate::parsing::{ParseError, SequenceOptions, SequenceSource};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to read genome source {source_name}: {error}")]
    Source {
        source_name: String,
        #[source]
        error: ParseError,
    },

    #[error("Failed to start scanning threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Settings for one probe search run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Length shared by every probe and every scan window
    pub probe_length: usize,

    /// Number of sources scanned at once; `1` scans strictly sequentially
    pub threads: usize,

    /// Cleaning applied to each target sequence after reading
    pub sequence: SequenceOptions,
}

impl SearchConfig {
    #[must_use]
    pub fn new(probe_length: usize) -> Self {
        Self {
            probe_length,
            threads: 1,
            sequence: SequenceOptions::default(),
        }
    }
}

/// Per-source progress figures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub name: String,
    /// Target sequence length in bases, after cleaning
    pub length: usize,
    pub matches: usize,
}

/// Informational totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub per_source: Vec<SourceSummary>,
    pub total_matches: usize,
}

/// Result of a run: the filled aggregator and its summary
#[derive(Debug)]
pub struct SearchOutcome {
    pub aggregator: MatchAggregator,
    pub summary: RunSummary,
}

impl SearchOutcome {
    /// Consume the outcome into ordered report rows
    #[must_use]
    pub fn into_report(self) -> Vec<ReportRow> {
        build_report(self.aggregator.into_snapshot())
    }
}

/// Hits of one source, held until they are folded in source order
struct SourceHits<'t> {
    name: String,
    length: usize,
    hits: Vec<Hit<'t>>,
}

/// Drives a probe search: owns the probe table and scans sources into a
/// [`MatchAggregator`].
///
/// Sources are folded into the aggregator in the order they are given, both
/// when scanning sequentially and in parallel, so location lists group by
/// source and the output does not depend on the thread count.
#[derive(Debug)]
pub struct ProbeSearch {
    table: ProbeTable,
    config: SearchConfig,
}

impl ProbeSearch {
    /// Build the probe table for a run
    pub fn new<I>(probes: I, config: SearchConfig) -> Self
    where
        I: IntoIterator<Item = Probe>,
    {
        let table = ProbeTable::build(probes, config.probe_length);
        let stats = table.stats();
        info!(
            "Loaded {} unique probes of length {} ({} probes read, {} of other lengths skipped, {} duplicate sequences)",
            table.len(),
            config.probe_length,
            stats.total,
            stats.wrong_length,
            stats.duplicates
        );
        Self { table, config }
    }

    #[must_use]
    pub fn table(&self) -> &ProbeTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Scan every source and collect their matches.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Source` for the first source, in the order given,
    /// that cannot be read; the whole run is aborted. Returns `SearchError::ThreadPool` if parallel
    /// scanning was requested and the pool cannot be created.
    pub fn run<S>(&self, sources: &[S]) -> Result<SearchOutcome, SearchError>
    where
        S: SequenceSource + Sync,
    {
        let aggregator = MatchAggregator::new();
        let mut summary = RunSummary::default();

        if self.config.threads > 1 && sources.len() > 1 {
            debug!(
                "Scanning {} sources with {} threads",
                sources.len(),
                self.config.threads
            );
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()?;
            let scanned: Vec<Result<SourceHits<'_>, SearchError>> = pool.install(|| {
                sources
                    .par_iter()
                    .map(|source| self.scan_source(source))
                    .collect()
            });

            // Fail on the earliest failing source, not whichever thread finished first
            let scanned = scanned.into_iter().collect::<Result<Vec<_>, _>>()?;
            for source_hits in scanned {
                let name: Arc<str> = Arc::from(source_hits.name.as_str());
                let matches = aggregator.merge(&name, source_hits.hits);
                summary.add(source_hits.name, source_hits.length, matches);
            }
        } else {
            for source in sources {
                let source_hits = self.scan_source(source)?;
                let name: Arc<str> = Arc::from(source_hits.name.as_str());
                let matches = aggregator.merge(&name, source_hits.hits);
                summary.add(source_hits.name, source_hits.length, matches);
            }
        }

        info!("Found {} matches in total", summary.total_matches);
        Ok(SearchOutcome {
            aggregator,
            summary,
        })
    }

    fn scan_source<S: SequenceSource>(&self, source: &S) -> Result<SourceHits<'_>, SearchError> {
        debug!("Reading {}", source.name());
        let target = source
            .load(self.config.sequence)
            .map_err(|error| SearchError::Source {
                source_name: source.name().to_string(),
                error,
            })?;

        let hits: Vec<Hit<'_>> = scan(&target.sequence, self.config.probe_length, &self.table).collect();
        info!(
            "{}: {} bases, found {} matches",
            target.name,
            target.len(),
            hits.len()
        );

        Ok(SourceHits {
            name: target.name,
            length: target.sequence.len(),
            hits,
        })
    }
}

impl RunSummary {
    fn add(&mut self, name: String, length: usize, matches: usize) {
        self.total_matches += matches;
        self.per_source.push(SourceSummary {
            name,
            length,
            matches,
        });
    }
}

/// Build the table, scan `sources` in order and return the outcome
///
/// # Errors
///
/// See [`ProbeSearch::run`].
pub fn run_search<I, S>(probes: I, sources: &[S], config: SearchConfig) -> Result<SearchOutcome, SearchError>
where
    I: IntoIterator<Item = Probe>,
    S: SequenceSource + Sync,
{
    ProbeSearch::new(probes, config).run(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::TargetSequence;
    use crate::matching::report::{write_report, ReportFormat};
    use crate::parsing::fasta::FastaSource;

    fn report_csv(outcome: SearchOutcome) -> String {
        let mut out = Vec::new();
        write_report(&outcome.into_report(), &mut out, ReportFormat::Csv).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let sources = vec![TargetSequence::new("seq1", "TTACGTTTACGTAA")];
        let outcome = run_search(
            vec![Probe::new("ACGT", "P1")],
            &sources,
            SearchConfig::new(4),
        )
        .unwrap();

        assert_eq!(outcome.summary.total_matches, 2);
        let rows = outcome.into_report();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].identifier, "P1");
        assert_eq!(rows[0].sequence, "ACGT");
        assert_eq!(rows[0].match_count, 2);
        assert_eq!(rows[0].joined_locations(), "seq1:2,seq1:8");
    }

    #[test]
    fn test_zero_match_probe_has_no_row() {
        let sources = vec![TargetSequence::new("seq1", "TTACGTTT")];
        let rows = run_search(
            vec![Probe::new("ACGT", "P1"), Probe::new("GGGG", "P2")],
            &sources,
            SearchConfig::new(4),
        )
        .unwrap()
        .into_report();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].identifier, "P1");
    }

    #[test]
    fn test_short_and_empty_sources_do_not_error() {
        let sources = vec![
            TargetSequence::new("empty", ""),
            TargetSequence::new("short", "ACG"),
            TargetSequence::new("seq", "ACGT"),
        ];
        let outcome = run_search(vec![Probe::new("ACGT", "P1")], &sources, SearchConfig::new(4)).unwrap();

        let per_source: Vec<(&str, usize)> = outcome
            .summary
            .per_source
            .iter()
            .map(|s| (s.name.as_str(), s.matches))
            .collect();
        assert_eq!(per_source, vec![("empty", 0), ("short", 0), ("seq", 1)]);
        assert_eq!(outcome.summary.total_matches, 1);
    }

    #[test]
    fn test_empty_table_gives_header_only_report() {
        let sources = vec![TargetSequence::new("seq1", "ACGTACGT")];
        let outcome = run_search(Vec::new(), &sources, SearchConfig::new(4)).unwrap();
        assert_eq!(
            report_csv(outcome),
            "probe id,probe sequence,match count,match locations\n"
        );
    }

    #[test]
    fn test_locations_group_by_source_order() {
        let sources = vec![
            TargetSequence::new("a.fa", "AATTxAATT"),
            TargetSequence::new("b.fa", "CCGGAATT"),
        ];
        let rows = run_search(
            vec![Probe::new("CCGG", "P2"), Probe::new("AATT", "P1")],
            &sources,
            SearchConfig::new(4),
        )
        .unwrap()
        .into_report();

        assert_eq!(rows[0].sequence, "AATT");
        assert_eq!(rows[0].joined_locations(), "a.fa:0,a.fa:5,b.fa:4");
        assert_eq!(rows[1].sequence, "CCGG");
        assert_eq!(rows[1].joined_locations(), "b.fa:0");
    }

    #[test]
    fn test_acgt_only_shifts_offsets() {
        let sources = vec![TargetSequence::new("seq", "NNACGT")];

        let rows = run_search(vec![Probe::new("ACGT", "P1")], &sources, SearchConfig::new(4))
            .unwrap()
            .into_report();
        assert_eq!(rows[0].joined_locations(), "seq:2");

        let mut config = SearchConfig::new(4);
        config.sequence.acgt_only = true;
        let rows = run_search(vec![Probe::new("ACGT", "P1")], &sources, config)
            .unwrap()
            .into_report();
        assert_eq!(rows[0].joined_locations(), "seq:0");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sources: Vec<TargetSequence> = (0..8)
            .map(|i| {
                let seq = "ACGTTGCAAACGTCCGGAATT".repeat(i + 1);
                TargetSequence::new(format!("chr{i}.fa"), seq)
            })
            .collect();
        let probes = vec![
            Probe::new("ACGT", "P1"),
            Probe::new("CCGG", "P2"),
            Probe::new("AATT", "P3"),
            Probe::new("TTGC", "P4"),
        ];

        let sequential = run_search(probes.clone(), &sources, SearchConfig::new(4)).unwrap();
        let mut config = SearchConfig::new(4);
        config.threads = 4;
        let parallel = run_search(probes, &sources, config).unwrap();

        assert_eq!(sequential.summary, parallel.summary);
        assert_eq!(report_csv(sequential), report_csv(parallel));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let sources = vec![
            TargetSequence::new("x", "ACGTACGTAATT"),
            TargetSequence::new("y", "AATTACGT"),
        ];
        let probes = vec![Probe::new("ACGT", "P1"), Probe::new("AATT", "P2")];

        let first = report_csv(run_search(probes.clone(), &sources, SearchConfig::new(4)).unwrap());
        let second = report_csv(run_search(probes, &sources, SearchConfig::new(4)).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_error_names_first_failing_source() {
        let sources = vec![
            FastaSource::new("/nonexistent/a.fa"),
            FastaSource::new("/nonexistent/b.fa"),
            FastaSource::new("/nonexistent/c.fa"),
            FastaSource::new("/nonexistent/d.fa"),
        ];
        let mut config = SearchConfig::new(4);
        config.threads = 4;

        for _ in 0..8 {
            let err = run_search(vec![Probe::new("ACGT", "P1")], &sources, config).unwrap_err();
            assert!(matches!(err, SearchError::Source { ref source_name, .. } if source_name == "a.fa"));
        }
    }

    #[test]
    fn test_unreadable_source_aborts_run() {
        let sources = vec![FastaSource::new("/nonexistent/chr1.fa")];
        let err = run_search(vec![Probe::new("ACGT", "P1")], &sources, SearchConfig::new(4)).unwrap_err();
        assert!(matches!(err, SearchError::Source { ref source_name, .. } if source_name == "chr1.fa"));
    }
}
