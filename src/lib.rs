//! # probe-search
//!
//! A library for locating microarray probe sequences in a reference genome.
//!
//! Probe design is usually validated by checking that each probe occurs where
//! it is expected to, and nowhere else. `probe-search` takes a set of
//! fixed-length probe sequences and reports, for every probe, how many times and
//! where it occurs exactly across a directory of genome FASTA files.
//!
//! ## Features
//!
//! - **Exact matching**: every overlapping occurrence at every offset is reported
//! - **Rolling lookup**: 2-bit packed k-mers for ACGT probes up to 32 bases
//! - **Deterministic output**: rows sorted by probe sequence, then identifier
//! - **Parallel scanning**: optional, with output identical to a sequential run
//!
//! ## Example
//!
//! ```rust,no_run
//! use probe_search::{ProbeSearch, SearchConfig};
//! use probe_search::parsing::probes::{parse_probe_file, ProbeColumns};
//! use probe_search::parsing::sources::discover_sources;
//! use std::path::Path;
//!
//! let probes = parse_probe_file(Path::new("probes.tsv"), &ProbeColumns::default()).unwrap();
//! let sources = discover_sources(Path::new("genome/")).unwrap();
//!
//! let search = ProbeSearch::new(probes, SearchConfig::new(25));
//! let outcome = search.run(&sources).unwrap();
//!
//! for row in outcome.into_report() {
//!     println!("{}\t{}\t{}", row.identifier, row.sequence, row.match_count);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Probes, target sequences and match locations
//! - [`matching`]: Probe table, scanner, aggregator, report and run controller
//! - [`parsing`]: Probe file, FASTA and genome directory readers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::types::*;
pub use crate::core::{Probe, TargetSequence};
pub use matching::{MatchAggregator, ProbeSearch, ProbeTable, ReportRow, SearchConfig};
