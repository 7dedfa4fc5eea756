//! Tabular ingestion: CSV and workbook reading, encoding fallback, column
//! repair, and eager-vs-chunked strategy selection.

pub mod chunked;
pub mod csv_reader;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod raw_table;
pub mod repair;
pub mod strategy;
pub mod values;
pub mod workbook;

pub use chunked::CsvPartitions;
pub use csv_reader::read_csv_table;
pub use discovery::scan_files;
pub use encoding::decode_with_fallback;
pub use error::IngestError;
pub use raw_table::RawTable;
pub use repair::{dedupe_headers, raw_from_frame, repair_table};
pub use strategy::{ExecutionStrategy, file_size_mb, select_strategy};
pub use values::{any_to_string, format_numeric, parse_f64, parse_i64};
pub use workbook::{SheetTable, read_workbook};
