//! Readers for the inputs of a probe search.
//!
//! - **Probe files**: tab-delimited text with named sequence and identifier columns
//! - **FASTA files**: one target sequence per file, optionally gzip/bgzip compressed
//! - **Genome directories**: every regular file in a directory is one source
//!
//! ## Example
//!
//! ```rust,no_run
//! use probe_search::parsing::probes::{parse_probe_file, ProbeColumns};
//! use probe_search::parsing::sources::discover_sources;
//! use std::path::Path;
//!
//! let probes = parse_probe_file(Path::new("probes.tsv"), &ProbeColumns::default()).unwrap();
//! let sources = discover_sources(Path::new("genome/")).unwrap();
//! println!("{} probes, {} genome files", probes.len(), sources.len());
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::core::sequence::TargetSequence;
use crate::utils::validation::retain_acgt;

pub mod fasta;
pub mod probes;
pub mod sources;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Couldn't find column {0} in probe file")]
    MissingColumn(String),

    #[error("{} is not a readable directory", .0.display())]
    NotADirectory(PathBuf),
}

/// How a target sequence is cleaned after it is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceOptions {
    /// Remove every symbol other than uppercase `A`, `C`, `G`, `T`
    pub acgt_only: bool,
}

impl SequenceOptions {
    pub(crate) fn apply(self, sequence: &mut Vec<u8>) {
        if self.acgt_only {
            retain_acgt(sequence);
        }
    }
}

/// A named genome source that can produce one target sequence
pub trait SequenceSource {
    /// Name used in location strings
    fn name(&self) -> &str;

    /// Read the target sequence.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the source cannot be read.
    fn load(&self, options: SequenceOptions) -> Result<TargetSequence, ParseError>;
}

impl SequenceSource for TargetSequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, options: SequenceOptions) -> Result<TargetSequence, ParseError> {
        let mut target = self.clone();
        options.apply(&mut target.sequence);
        Ok(target)
    }
}
