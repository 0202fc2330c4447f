//! Reader for genome FASTA files using noodles.
//!
//! Each file is one source and yields one target sequence: the first record's
//! sequence lines, concatenated. Supports both uncompressed and gzip/bgzip
//! compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tracing::{debug, warn};

use crate::core::sequence::TargetSequence;
use crate::parsing::{ParseError, SequenceOptions, SequenceSource};

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    // Check for gzipped FASTA
    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    // Check for uncompressed FASTA
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// A genome source backed by a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaSource {
    pub path: PathBuf,

    /// File name, used in location strings
    pub name: String,
}

impl FastaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), OsStr::to_string_lossy)
            .into_owned();
        Self { path, name }
    }
}

impl SequenceSource for FastaSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, options: SequenceOptions) -> Result<TargetSequence, ParseError> {
        let sequence = read_first_sequence(&self.path, options)?;
        Ok(TargetSequence::new(self.name.clone(), sequence))
    }
}

/// Read the sequence of the first record of a FASTA file.
///
/// Whitespace inside the sequence is dropped and `options` are applied. An
/// empty file gives an empty sequence.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or decompressed.
pub fn read_first_sequence(path: &Path, options: SequenceOptions) -> Result<Vec<u8>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(MultiGzDecoder::new(file));
        read_first_sequence_from(reader, options)
    } else {
        read_first_sequence_from(BufReader::new(file), options)
    }
}

/// Read the first record's sequence from any buffered FASTA stream.
///
/// Leading blank lines are skipped. Text before any header line, or after a
/// header with no name, is read as sequence up to the next blank or header
/// line. Input with no sequence lines at all gives an empty sequence.
///
/// # Errors
///
/// Returns `ParseError::Io` if the stream cannot be read.
pub fn read_first_sequence_from<R: BufRead>(
    mut reader: R,
    options: SequenceOptions,
) -> Result<Vec<u8>, ParseError> {
    let mut first_line = Vec::new();
    loop {
        first_line.clear();
        if reader.read_until(b'\n', &mut first_line)? == 0 {
            debug!("No FASTA records found; using an empty sequence");
            return Ok(Vec::new());
        }
        if !is_blank(&first_line) {
            break;
        }
    }

    let unnamed_header = first_line.strip_prefix(b">").map(is_blank);
    let mut sequence = match unnamed_header {
        Some(false) => read_named_record(Cursor::new(first_line).chain(reader))?,
        Some(true) => {
            warn!("FASTA header without a name; reading the lines that follow as sequence");
            read_unnamed_lines(reader, Vec::new())?
        }
        None => {
            warn!("No FASTA header line; reading the leading lines as sequence");
            read_unnamed_lines(reader, first_line)?
        }
    };
    options.apply(&mut sequence);

    Ok(sequence)
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn strip_whitespace(line: &[u8]) -> impl Iterator<Item = u8> + '_ {
    line.iter().copied().filter(|b| !b.is_ascii_whitespace())
}

fn read_named_record<R: BufRead>(reader: R) -> Result<Vec<u8>, ParseError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let Some(result) = fasta_reader.records().next() else {
        return Ok(Vec::new());
    };
    let record = result?;
    Ok(strip_whitespace(record.sequence().as_ref()).collect())
}

/// Sequence lines of a record without a usable header, starting with `pending`
fn read_unnamed_lines<R: BufRead>(mut reader: R, pending: Vec<u8>) -> Result<Vec<u8>, ParseError> {
    let mut sequence: Vec<u8> = strip_whitespace(&pending).collect();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 || is_blank(&line) || line[0] == b'>' {
            break;
        }
        sequence.extend(strip_whitespace(&line));
    }
    Ok(sequence)
}
