use std::path::Path;

use tracing::{debug, warn};

use crate::parsing::fasta::{is_fasta_file, FastaSource};
use crate::parsing::ParseError;

/// List the genome sources in a directory.
///
/// Every regular file is a source; subdirectories are skipped. Files without a
/// FASTA extension are still used but logged. Sources are returned sorted by
/// file name, which is the order they are scanned and reported in.
///
/// # Errors
///
/// Returns `ParseError::NotADirectory` if `dir` is not a directory, or
/// `ParseError::Io` if it cannot be listed.
pub fn discover_sources(dir: &Path) -> Result<Vec<FastaSource>, ParseError> {
    if !dir.is_dir() {
        return Err(ParseError::NotADirectory(dir.to_path_buf()));
    }

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            debug!("Skipping non-file entry {}", path.display());
            continue;
        }
        if !is_fasta_file(&path) {
            warn!(
                "{} does not have a FASTA extension; reading it as FASTA anyway",
                path.display()
            );
        }
        sources.push(FastaSource::new(path));
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chr2.fa"), ">chr2\nACGT\n").unwrap();
        std::fs::write(dir.path().join("chr1.fa"), ">chr1\nACGT\n").unwrap();
        std::fs::write(dir.path().join("chrM.fasta.gz"), b"").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let sources = discover_sources(dir.path()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["chr1.fa", "chr2.fa", "chrM.fasta.gz"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_sources(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = discover_sources(file.path());
        assert!(matches!(result, Err(ParseError::NotADirectory(_))));

        let result = discover_sources(Path::new("/nonexistent/genome"));
        assert!(matches!(result, Err(ParseError::NotADirectory(_))));
    }
}
