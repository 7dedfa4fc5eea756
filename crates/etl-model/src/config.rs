//! Loader configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File size threshold (in megabytes) above which CSV files are read in
/// partitions instead of eagerly.
pub const DEFAULT_THRESHOLD_MB: f64 = 100.0;

/// Partition size (in bytes) for the chunked CSV path. Default: 64 MiB.
pub const DEFAULT_CHUNK_BYTES: usize = 64 * 1024 * 1024;

/// Default ordered encoding-fallback list for eager CSV decoding.
///
/// Japanese-language corpora commonly need `shift_jis` and `iso-8859-1`
/// appended; the list is configuration, not code.
pub fn default_encodings() -> Vec<String> {
    vec!["utf-8".to_string()]
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_threshold_mb() -> f64 {
    DEFAULT_THRESHOLD_MB
}

fn default_chunk_bytes() -> usize {
    DEFAULT_CHUNK_BYTES
}

fn default_qualify_collisions() -> bool {
    true
}

/// Configuration for a structured-load session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Destination SQLite database file.
    pub db_path: PathBuf,

    /// Always use the chunked CSV path regardless of file size.
    #[serde(default)]
    pub force_chunked: bool,

    /// Size threshold (MB) above which CSV files use the chunked path.
    #[serde(default = "default_threshold_mb")]
    pub threshold_mb: f64,

    /// Partition size in bytes for the chunked path.
    #[serde(default = "default_chunk_bytes")]
    pub chunk_bytes: usize,

    /// Ordered encoding labels tried when decoding CSV files eagerly.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,

    /// Directory receiving the sidecar failure log.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Qualify table names with a path hash when two files share a stem.
    /// When disabled, the later file replaces the earlier table.
    #[serde(default = "default_qualify_collisions")]
    pub qualify_collisions: bool,
}

impl LoaderConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            force_chunked: false,
            threshold_mb: DEFAULT_THRESHOLD_MB,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            encodings: default_encodings(),
            log_dir: default_log_dir(),
            qualify_collisions: true,
        }
    }

    /// Force the chunked CSV path for every file.
    #[must_use]
    pub fn with_force_chunked(mut self, force: bool) -> Self {
        self.force_chunked = force;
        self
    }

    /// Set the eager/chunked size threshold in megabytes.
    #[must_use]
    pub fn with_threshold_mb(mut self, threshold_mb: f64) -> Self {
        self.threshold_mb = threshold_mb;
        self
    }

    /// Set the chunked partition size in bytes.
    #[must_use]
    pub fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes;
        self
    }

    /// Replace the encoding fallback list.
    #[must_use]
    pub fn with_encodings(mut self, encodings: Vec<String>) -> Self {
        self.encodings = encodings;
        self
    }

    /// Set the directory for the failure log.
    #[must_use]
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Enable or disable table-name collision qualification.
    #[must_use]
    pub fn with_qualify_collisions(mut self, qualify: bool) -> Self {
        self.qualify_collisions = qualify;
        self
    }
}
