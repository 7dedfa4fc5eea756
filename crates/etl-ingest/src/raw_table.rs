//! Raw tabular data as parsed from a source file, before repair.

/// A rectangular grid of string cells with a header row.
///
/// Rows are always padded or truncated to the header width at parse time,
/// so `rows[i].len() == headers.len()` holds for every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// True when there is no header row at all.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Strip BOM and collapse interior whitespace runs in a header cell.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Trim a data cell, stripping any stray BOM.
pub fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Pad a record to the header width with blanks, dropping extra cells.
pub fn pad_row(record: &[String], width: usize) -> Vec<String> {
    let mut row = Vec::with_capacity(width);
    for idx in 0..width {
        let value = record.get(idx).map(String::as_str).unwrap_or("");
        row.push(value.to_string());
    }
    row
}
