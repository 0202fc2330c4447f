//! The probe matching engine.
//!
//! - [`ProbeTable`]: immutable map from probe sequence to identifier
//! - [`scan`]: sliding-window scan of one target sequence against the table
//! - [`MatchAggregator`]: run-wide accumulator of `source:offset` locations
//! - [`build_report`]: deterministic, sorted summary rows
//! - [`ProbeSearch`]: runs the whole pipeline over a list of sources
//!
//! ## Example
//!
//! ```rust
//! use probe_search::core::{Probe, TargetSequence};
//! use probe_search::matching::{run_search, SearchConfig};
//!
//! let probes = vec![Probe::new("ACGT", "P1")];
//! let sources = vec![TargetSequence::new("seq1", "TTACGTTTACGTAA")];
//!
//! let rows = run_search(probes, &sources, SearchConfig::new(4))
//!     .unwrap()
//!     .into_report();
//!
//! assert_eq!(rows[0].match_count, 2);
//! assert_eq!(rows[0].joined_locations(), "seq1:2,seq1:8");
//! ```

pub mod aggregator;
pub mod controller;
pub mod report;
pub mod scanner;
pub mod table;

pub use aggregator::MatchAggregator;
pub use controller::{run_search, ProbeSearch, RunSummary, SearchConfig, SearchError, SearchOutcome};
pub use report::{build_report, write_report, ReportFormat, ReportRow};
pub use scanner::{scan, Hit};
pub use table::ProbeTable;
