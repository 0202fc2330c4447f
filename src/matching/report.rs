use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::core::types::{MatchLocation, ProbeKey};

/// Column names of the delimited report, in order
pub const REPORT_HEADER: [&str; 4] = [
    "probe id",
    "probe sequence",
    "match count",
    "match locations",
];

/// Delimiter between locations within one row
pub const LOCATION_DELIMITER: &str = ",";

/// One summary row per probe that matched at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "probe_id")]
    pub identifier: String,

    #[serde(rename = "probe_sequence")]
    pub sequence: String,

    pub match_count: usize,

    /// `source:offset` strings, in the order they were recorded
    #[serde(rename = "match_locations")]
    pub locations: Vec<String>,
}

impl ReportRow {
    /// All locations joined with [`LOCATION_DELIMITER`]
    #[must_use]
    pub fn joined_locations(&self) -> String {
        self.locations.join(LOCATION_DELIMITER)
    }
}

/// Build report rows ordered by `(sequence, identifier)`.
///
/// The ordering depends only on the keys, never on the order hits were
/// recorded, so identical inputs always give identical reports.
#[must_use]
pub fn build_report(snapshot: BTreeMap<ProbeKey, Vec<MatchLocation>>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = snapshot
        .into_iter()
        .map(|(key, locations)| ReportRow {
            identifier: key.identifier,
            sequence: key.sequence,
            match_count: locations.len(),
            locations: locations.iter().map(ToString::to_string).collect(),
        })
        .collect();

    // Total order on (sequence, identifier), independent of the map type
    rows.sort_by(|a, b| {
        a.sequence
            .cmp(&b.sequence)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
    rows
}

/// How report rows are rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Comma-separated, minimal quoting
    #[default]
    Csv,
    /// Tab-separated
    Tsv,
    /// JSON array of row objects
    Json,
}

impl ReportFormat {
    /// File extension used for default output paths
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }
}

/// Render rows to a writer.
///
/// Delimited formats always end lines with `\n`, independent of platform.
///
/// # Errors
///
/// Returns an error if writing fails or a row cannot be serialized.
pub fn write_report<W: Write>(rows: &[ReportRow], writer: W, format: ReportFormat) -> anyhow::Result<()> {
    match format {
        ReportFormat::Csv => write_delimited(rows, writer, b','),
        ReportFormat::Tsv => write_delimited(rows, writer, b'\t'),
        ReportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            Ok(())
        }
    }
}

fn write_delimited<W: Write>(rows: &[ReportRow], writer: W, delimiter: u8) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.write_record([
            row.identifier.as_str(),
            row.sequence.as_str(),
            row.match_count.to_string().as_str(),
            row.joined_locations().as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
