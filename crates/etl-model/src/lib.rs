pub mod config;
pub mod format;
pub mod table_name;

pub use config::{
    DEFAULT_CHUNK_BYTES, DEFAULT_THRESHOLD_MB, LoaderConfig, default_encodings,
};
pub use format::SourceFormat;
pub use table_name::{path_qualifier, sheet_table_name, table_name_for_path};
