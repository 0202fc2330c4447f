//! Core data types for probe matching.
//!
//! - [`Probe`]: a fixed-length query sequence with its identifier
//! - [`TargetSequence`]: one flattened genome sequence with its source name
//! - [`MatchLocation`]: a `(source, offset)` pair for one exact occurrence
//! - [`ProbeKey`]: the `(sequence, identifier)` key matches are aggregated under
//!
//! Offsets are zero-based and local to the target sequence they were found in.
//! There is no notion of genomic coordinates beyond that flat offset.

pub mod probe;
pub mod sequence;
pub mod types;

pub use probe::Probe;
pub use sequence::TargetSequence;
pub use types::{MatchLocation, ProbeKey};
