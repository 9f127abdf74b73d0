// Reference metadata table (CSV) consistency check.
//
// The metadata file holds the source texts the reference embeddings were
// computed from. It is not needed for scoring; at startup its record count is
// compared with the row count of the embedding file so a mismatch shows up
// in the logs.

use std::path::Path;

use anyhow::{Context, Result};

/// Metadata record count next to the embedding row count it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataCheck {
    pub records: usize,
    pub reference_rows: usize,
}

impl MetadataCheck {
    pub fn is_consistent(&self) -> bool {
        self.records == self.reference_rows
    }
}

/// Count data records in a CSV file, excluding the header row.
///
/// Quoted fields may span lines; rows may have differing field counts.
pub fn count_records(path: &Path) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open reference metadata {}", path.display()))?;

    let mut count = 0;
    for record in reader.records() {
        record.with_context(|| format!("Malformed record in {}", path.display()))?;
        count += 1;
    }
    Ok(count)
}

/// Count the metadata records at `path` and pair them with `reference_rows`.
pub fn check(path: &Path, reference_rows: usize) -> Result<MetadataCheck> {
    Ok(MetadataCheck {
        records: count_records(path)?,
        reference_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_counts_excluding_header() {
        let (_dir, path) = write("id,text\n1,a\n2,b\n");
        assert_eq!(count_records(&path).unwrap(), 2);
    }

    #[test]
    fn test_no_trailing_newline() {
        let (_dir, path) = write("id,text\n1,a");
        assert_eq!(count_records(&path).unwrap(), 1);
    }

    #[test]
    fn test_quoted_newlines_stay_in_record() {
        let (_dir, path) = write("id,text\n1,\"line one\nline two\"\n2,b\n");
        assert_eq!(count_records(&path).unwrap(), 2);
    }

    #[test]
    fn test_header_only_is_zero() {
        let (_dir, path) = write("id,text\n");
        assert_eq!(count_records(&path).unwrap(), 0);
    }

    #[test]
    fn test_missing_file_errors() {
        let err = count_records(Path::new("/nonexistent/meta.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open reference metadata"));
    }

    #[test]
    fn test_check_flags_mismatch() {
        let (_dir, path) = write("id,text\n1,a\n2,b\n3,c\n");
        let result = check(&path, 2).unwrap();
        assert_eq!(result.records, 3);
        assert!(!result.is_consistent());
        assert!(check(&path, 3).unwrap().is_consistent());
    }
}
