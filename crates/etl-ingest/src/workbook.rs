//! Workbook (XLSX/XLSM) reading: one raw table per sheet.
//!
//! Sheets are parsed eagerly in file order. A sheet that fails to parse
//! does not prevent later sheets from loading; the per-sheet result
//! carries its own error so the batch driver can record it in isolation.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::error::IngestError;
use crate::raw_table::{RawTable, normalize_header};
use crate::values::format_numeric;

/// One sheet of a workbook with its parse result.
#[derive(Debug)]
pub struct SheetTable {
    /// Sheet name as stored in the workbook.
    pub name: String,
    /// Parsed table, or the sheet-level failure.
    pub table: Result<RawTable, IngestError>,
}

/// Open a workbook and parse every sheet in file order.
///
/// The outer error means the workbook itself could not be opened; per-sheet
/// failures are isolated inside [`SheetTable::table`].
pub fn read_workbook(path: &Path) -> Result<Vec<SheetTable>, IngestError> {
    let mut workbook = open_workbook_auto(path).map_err(|error| IngestError::Workbook {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let table = match workbook.worksheet_range(&name) {
            Ok(range) => {
                let table = range_to_table(&range);
                debug!(
                    path = %path.display(),
                    sheet = name.as_str(),
                    columns = table.headers.len(),
                    rows = table.rows.len(),
                    "sheet parsed"
                );
                Ok(table)
            }
            Err(error) => Err(IngestError::Workbook {
                path: path.to_path_buf(),
                message: format!("sheet '{name}': {error}"),
            }),
        };
        sheets.push(SheetTable { name, table });
    }
    Ok(sheets)
}

fn range_to_table(range: &calamine::Range<Data>) -> RawTable {
    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return RawTable::new(Vec::new(), Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| normalize_header(&cell_to_string(cell)))
        .collect();
    let width = headers.len();
    let mut rows = Vec::new();
    for row in rows_iter {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            let value = row.get(idx).map(cell_to_string).unwrap_or_default();
            cells.push(value);
        }
        rows.push(cells);
    }
    RawTable::new(headers, rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_numeric(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_workbook_is_an_error() {
        let err = read_workbook(Path::new("/nonexistent/book.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::Workbook { .. }));
    }

    #[test]
    fn cells_stringify_like_sql_text() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("  x ".into())), "x");
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }
}
