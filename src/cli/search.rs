use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::matching::controller::{ProbeSearch, SearchConfig};
use crate::matching::report::{write_report, ReportFormat, ReportRow};
use crate::parsing::probes::{
    parse_probe_file, ProbeColumns, DEFAULT_IDENTIFIER_COLUMN, DEFAULT_SEQUENCE_COLUMN,
};
use crate::parsing::sources::discover_sources;
use crate::parsing::SequenceOptions;

#[derive(Args)]
pub struct SearchArgs {
    /// The length of the probe sequences to search for
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub probe_length: u32,

    /// The TSV file of probe sequences
    pub probe_sequence_file: PathBuf,

    /// The directory containing the genome in FASTA files
    pub genome_directory: PathBuf,

    /// The name of the column of the probe file containing probe sequences
    #[arg(long, default_value = DEFAULT_SEQUENCE_COLUMN)]
    pub probe_sequence_header: String,

    /// The name of the column of the probe file containing probe IDs
    #[arg(long, default_value = DEFAULT_IDENTIFIER_COLUMN)]
    pub probe_id_header: String,

    /// Remove every symbol other than A, C, G and T from genome sequences
    /// before searching (offsets then refer to the filtered sequence)
    #[arg(long)]
    pub acgt_only: bool,

    /// Number of genome files to scan at once
    #[arg(short = 't', long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Output path ('-' for stdout).
    /// Defaults to <PROBE_SEQUENCE_FILE>-matches.<format>
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ReportFormat,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the probe file or genome directory cannot be read,
/// a required probe column is missing, a genome file cannot be read, or the
/// report cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, verbose: bool) -> anyhow::Result<()> {
    let columns = ProbeColumns {
        sequence: args.probe_sequence_header.clone(),
        identifier: args.probe_id_header.clone(),
    };

    // Configuration errors surface here, before any genome file is read
    let probes = parse_probe_file(&args.probe_sequence_file, &columns).with_context(|| {
        format!(
            "Failed to load probes from {}",
            args.probe_sequence_file.display()
        )
    })?;
    let sources = discover_sources(&args.genome_directory)?;

    if verbose {
        eprintln!(
            "Read {} probes; {} genome files in {}",
            probes.len(),
            sources.len(),
            args.genome_directory.display()
        );
    }
    if sources.is_empty() {
        warn!(
            "No genome files found in {}",
            args.genome_directory.display()
        );
    }

    let config = SearchConfig {
        probe_length: usize::try_from(args.probe_length)?,
        threads: usize::try_from(args.threads)?,
        sequence: SequenceOptions {
            acgt_only: args.acgt_only,
        },
    };
    let search = ProbeSearch::new(probes, config);
    let outcome = search.run(&sources)?;
    let rows = outcome.into_report();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.probe_sequence_file, args.format));
    write_rows(&rows, &output, args.format)?;

    Ok(())
}

/// `<probe file>-matches.<ext>`, next to the probe file
fn default_output_path(probe_file: &Path, format: ReportFormat) -> PathBuf {
    let mut path = probe_file.as_os_str().to_owned();
    path.push(format!("-matches.{}", format.extension()));
    PathBuf::from(path)
}

fn write_rows(rows: &[ReportRow], output: &Path, format: ReportFormat) -> anyhow::Result<()> {
    if output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_report(rows, &mut handle, format)?;
        handle.flush()?;
        return Ok(());
    }

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_report(rows, BufWriter::new(file), format)?;
    info!("Wrote {} probe rows to {}", rows.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/HG-U133A.probe_tab"), ReportFormat::Csv),
            PathBuf::from("data/HG-U133A.probe_tab-matches.csv")
        );
        assert_eq!(
            default_output_path(Path::new("probes.tsv"), ReportFormat::Json),
            PathBuf::from("probes.tsv-matches.json")
        );
    }
}
