//! Column repair: normalize headers, drop empty rows and columns, and
//! assemble the repaired frame.
//!
//! Repair is idempotent: repairing an already-repaired table yields the
//! same frame. An empty result is not an error; the caller skips the write.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame};

use crate::error::IngestError;
use crate::raw_table::RawTable;
use crate::values::{any_to_string, parse_f64, parse_i64};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Disambiguate duplicate column names by appending `_1`, `_2`, … to the
/// second and later occurrences, preserving original order. Blank names
/// become `column`. Generated names that collide with an existing header
/// keep incrementing, which makes the operation idempotent.
pub fn dedupe_headers(headers: &[String]) -> Vec<String> {
    let existing: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for raw in headers {
        let base = if is_blank(raw) {
            "column".to_string()
        } else {
            raw.clone()
        };
        let count = counts.entry(base.clone()).or_insert(0);
        let mut candidate = if *count == 0 {
            base.clone()
        } else {
            format!("{base}_{count}")
        };
        while taken.contains(&candidate)
            || (candidate != *raw && existing.contains(candidate.as_str()))
        {
            *count += 1;
            candidate = format!("{base}_{count}");
        }
        *count += 1;
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Repair a raw table into a frame:
///
/// - rows where every cell is blank are dropped;
/// - columns where every cell is blank are dropped;
/// - duplicate and blank headers are renamed via [`dedupe_headers`];
/// - blank cells become nulls.
///
/// With `infer_types` set, a column whose non-null values all parse as
/// `i64` becomes `Int64`, all-`f64` becomes `Float64`, anything else stays
/// `String`. The chunked path always passes `false` so every partition
/// shares the all-text schema.
pub fn repair_table(table: &RawTable, infer_types: bool) -> Result<DataFrame, IngestError> {
    if table.headers.is_empty() {
        return Ok(DataFrame::empty());
    }
    let headers = dedupe_headers(&table.headers);

    let kept_rows: Vec<&Vec<String>> = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| !is_blank(cell)))
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let values: Vec<Option<String>> = kept_rows
            .iter()
            .map(|row| {
                let cell = row.get(col_idx).map(String::as_str).unwrap_or("");
                if is_blank(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        if values.iter().all(Option::is_none) {
            continue;
        }
        columns.push(build_column(header, values, infer_types));
    }

    if columns.is_empty() {
        return Ok(DataFrame::empty());
    }
    DataFrame::new(columns).map_err(|error| IngestError::Frame {
        message: error.to_string(),
    })
}

/// Rebuild a raw table from a frame. Used to re-apply repair and to
/// stringify frames in tests.
pub fn raw_from_frame(df: &DataFrame) -> Result<RawTable, IngestError> {
    let headers: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let mut rows = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let mut row = Vec::with_capacity(headers.len());
        for col in df.get_columns() {
            let value = col.get(row_idx).map_err(|error| IngestError::Frame {
                message: error.to_string(),
            })?;
            row.push(any_to_string(value));
        }
        rows.push(row);
    }
    Ok(RawTable::new(headers, rows))
}

fn build_column(name: &str, values: Vec<Option<String>>, infer_types: bool) -> Column {
    if infer_types {
        let non_null: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
        if non_null.iter().all(|v| parse_i64(v).is_some()) {
            let ints: Vec<Option<i64>> = values
                .iter()
                .map(|v| v.as_deref().and_then(parse_i64))
                .collect();
            return Column::new(name.into(), ints);
        }
        if non_null.iter().all(|v| parse_f64(v).is_some()) {
            let floats: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.as_deref().and_then(parse_f64))
                .collect();
            return Column::new(name.into(), floats);
        }
    }
    Column::new(name.into(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|s| (*s).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|s| (*s).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn duplicate_headers_get_numeric_suffixes_in_order() {
        let headers: Vec<String> = ["費用", "費用", "費用"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(dedupe_headers(&headers), vec!["費用", "費用_1", "費用_2"]);
    }

    #[test]
    fn suffix_collision_with_existing_header_keeps_incrementing() {
        let headers: Vec<String> = ["a", "a_1", "a"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(dedupe_headers(&headers), vec!["a", "a_1", "a_2"]);
    }

    #[test]
    fn dedupe_is_idempotent() {
        let headers: Vec<String> =
            ["a", "a", "b", "a"].iter().map(|s| (*s).to_string()).collect();
        let once = dedupe_headers(&headers);
        let twice = dedupe_headers(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn blank_headers_are_named() {
        let headers: Vec<String> = ["", "x", ""].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(dedupe_headers(&headers), vec!["column", "x", "column_1"]);
    }

    #[test]
    fn empty_rows_and_columns_are_dropped() {
        let t = table(
            &["a", "b", "c"],
            &[&["1", "", "x"], &["", "", ""], &["2", "", "y"]],
        );
        let df = repair_table(&t, false).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn repair_is_idempotent_on_frames() {
        let t = table(
            &["a", "a", "b"],
            &[&["1", "2", ""], &["", "", ""], &["3", "", "z"]],
        );
        let once = repair_table(&t, false).unwrap();
        let again = repair_table(&raw_from_frame(&once).unwrap(), false).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn all_empty_table_repairs_to_empty_frame() {
        let t = table(&["a", "b"], &[&["", ""], &["", " "]]);
        let df = repair_table(&t, false).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }

    #[test]
    fn header_only_table_repairs_to_empty_frame() {
        let t = table(&["a", "b"], &[]);
        let df = repair_table(&t, false).unwrap();
        assert_eq!(df.width(), 0);
    }

    #[test]
    fn type_inference_picks_int_float_text() {
        let t = table(
            &["i", "f", "s"],
            &[&["1", "1.5", "x"], &["2", "2", "y"], &["", "3.25", "3"]],
        );
        let df = repair_table(&t, true).unwrap();
        assert_eq!(df.column("i").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("f").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("s").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn no_inference_keeps_everything_text() {
        let t = table(&["i"], &[&["1"], &["2"]]);
        let df = repair_table(&t, false).unwrap();
        assert_eq!(df.column("i").unwrap().dtype(), &DataType::String);
    }
}
