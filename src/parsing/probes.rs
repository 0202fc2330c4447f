use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::core::probe::Probe;
use crate::parsing::ParseError;

/// Default name of the column holding probe sequences
pub const DEFAULT_SEQUENCE_COLUMN: &str = "PROBE_SEQUENCE";

/// Default name of the column holding probe identifiers
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "PROBESET_ID";

/// Names of the probe file columns to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeColumns {
    pub sequence: String,
    pub identifier: String,
}

impl Default for ProbeColumns {
    fn default() -> Self {
        Self {
            sequence: DEFAULT_SEQUENCE_COLUMN.to_string(),
            identifier: DEFAULT_IDENTIFIER_COLUMN.to_string(),
        }
    }
}

/// Parse a tab-delimited probe file with a header row.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened,
/// `ParseError::MissingColumn` if a required column is absent from the header,
/// or `ParseError::Csv` if the file is not valid delimited text.
pub fn parse_probe_file(path: &Path, columns: &ProbeColumns) -> Result<Vec<Probe>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_probe_reader(file, columns)
}

/// Parse tab-delimited probe text with a header row.
///
/// Fields are taken verbatim. Rows too short to hold both required fields are
/// skipped with a warning. Probes are returned in file order; length filtering
/// and duplicate handling happen when the probe table is built.
///
/// # Errors
///
/// Returns `ParseError::MissingColumn` if a required column is absent from the
/// header, or `ParseError::Csv` if the text is not valid delimited text.
pub fn parse_probe_reader<R: Read>(reader: R, columns: &ProbeColumns) -> Result<Vec<Probe>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    };
    let seq_idx = find(columns.sequence.as_str())?;
    let id_idx = find(columns.identifier.as_str())?;

    let mut probes = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        match (record.get(seq_idx), record.get(id_idx)) {
            (Some(sequence), Some(identifier)) => probes.push(Probe::new(sequence, identifier)),
            _ => {
                // Line numbers are 1-based and count the header
                warn!("Skipping probe file line {}: missing required fields", i + 2);
            }
        }
    }

    Ok(probes)
}
