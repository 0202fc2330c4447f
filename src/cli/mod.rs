//! Command-line interface for probe-search.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **search**: Find every exact occurrence of a set of probes in a genome directory
//!
//! ## Usage
//!
//! ```text
//! # Search 25-mer probes against every FASTA file in genome/
//! probe-search search 25 HG-U133A.probe_tab genome/
//!
//! # Probe files with other column names
//! probe-search search 25 probes.tsv genome/ --probe-sequence-header SEQ --probe-id-header ID
//!
//! # Scan four genome files at a time, write JSON to stdout
//! probe-search search 25 probes.tsv genome/ --threads 4 --format json --output -
//! ```

use clap::{Parser, Subcommand};

pub mod search;

#[derive(Parser)]
#[command(name = "probe-search")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Search for microarray probe sequences in a genome")]
#[command(
    long_about = "probe-search locates every exact occurrence of a set of fixed-length probe sequences in the FASTA files of a genome directory.\n\nFor each probe that matches at least once it reports:\n- The probe identifier and sequence\n- The number of matches\n- Every match location as <file>:<zero-based offset>"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a genome directory for probe sequences
    Search(search::SearchArgs),
}
