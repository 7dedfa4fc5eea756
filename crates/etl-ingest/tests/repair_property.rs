//! Property tests for column repair.

use etl_ingest::raw_table::RawTable;
use etl_ingest::repair::{dedupe_headers, raw_from_frame, repair_table};
use proptest::prelude::*;

fn header_strategy() -> impl Strategy<Value = String> {
    // Small name pool so duplicates are common.
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("cost".to_string()),
        Just(String::new()),
    ]
}

fn cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        "[a-z]{1,4}",
        "[0-9]{1,3}",
    ]
}

fn table_strategy() -> impl Strategy<Value = RawTable> {
    (1usize..5).prop_flat_map(|width| {
        let headers = prop::collection::vec(header_strategy(), width);
        let rows = prop::collection::vec(prop::collection::vec(cell_strategy(), width), 0..6);
        (headers, rows).prop_map(|(headers, rows)| RawTable::new(headers, rows))
    })
}

proptest! {
    #[test]
    fn repair_is_idempotent(table in table_strategy()) {
        let once = repair_table(&table, false).unwrap();
        let roundtrip = raw_from_frame(&once).unwrap();
        let twice = repair_table(&roundtrip, false).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repaired_frames_have_no_empty_rows_or_columns(table in table_strategy()) {
        let df = repair_table(&table, false).unwrap();
        let raw = raw_from_frame(&df).unwrap();
        for row in &raw.rows {
            prop_assert!(row.iter().any(|cell| !cell.trim().is_empty()));
        }
        for (idx, _header) in raw.headers.iter().enumerate() {
            let any_data = raw.rows.iter().any(|row| !row[idx].trim().is_empty());
            prop_assert!(any_data);
        }
    }

    #[test]
    fn deduped_headers_are_unique(headers in prop::collection::vec(header_strategy(), 1..8)) {
        let deduped = dedupe_headers(&headers);
        let mut sorted = deduped.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), deduped.len());
    }
}
