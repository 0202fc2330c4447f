use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// One exact occurrence of a probe sequence: a zero-based offset into the
/// target sequence of a named source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLocation {
    /// Owning source name, shared between all locations from that source
    pub source: Arc<str>,

    /// Zero-based start of the match within the source's target sequence
    pub offset: u64,
}

impl MatchLocation {
    pub fn new(source: Arc<str>, offset: u64) -> Self {
        Self { source, offset }
    }
}

/// Renders as `<source>:<offset>`, e.g. `chr1.fa:482913`
impl fmt::Display for MatchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.offset)
    }
}

/// Aggregation key for matches.
///
/// Field order matters: the derived `Ord` compares the sequence first and the
/// identifier second, which is the report's row order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProbeKey {
    pub sequence: String,
    pub identifier: String,
}

impl ProbeKey {
    pub fn new(sequence: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            identifier: identifier.into(),
        }
    }
}

impl fmt::Display for ProbeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.identifier, self.sequence)
    }
}
