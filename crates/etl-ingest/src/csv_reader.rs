//! Eager CSV reading: whole file decoded and parsed in memory.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::encoding::decode_with_fallback;
use crate::error::IngestError;
use crate::raw_table::{RawTable, normalize_cell, normalize_header, pad_row};

/// Read a CSV file into a [`RawTable`] using the configured encoding
/// fallback list.
///
/// The first record is the header row; data rows are padded or truncated
/// to the header width. An empty file yields an empty table.
pub fn read_csv_table(path: &Path, encodings: &[String]) -> Result<RawTable, IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_with_fallback(path, &bytes, encodings)?;
    let table = parse_csv_text(path, &text)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "csv parsed"
    );
    Ok(table)
}

/// Parse decoded CSV text into a [`RawTable`].
pub(crate) fn parse_csv_text(path: &Path, text: &str) -> Result<RawTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        if headers.is_empty() {
            headers = record.iter().map(normalize_header).collect();
            continue;
        }
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        rows.push(pad_row(&cells, headers.len()));
    }
    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = parse_csv_text(Path::new("t.csv"), "name,amount\nwidget,3\ngadget,5\n")
            .unwrap();
        assert_eq!(table.headers, vec!["name", "amount"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["widget", "3"]);
    }

    #[test]
    fn ragged_rows_are_padded_and_truncated() {
        let table = parse_csv_text(Path::new("t.csv"), "a,b,c\n1\n1,2,3,4\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = parse_csv_text(Path::new("t.csv"), "").unwrap();
        assert!(table.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn header_only_yields_no_rows() {
        let table = parse_csv_text(Path::new("t.csv"), "a,b\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert!(table.rows.is_empty());
    }
}
