//! Outcome records for a load session.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A table successfully written to the destination.
#[derive(Debug, Clone)]
pub struct TableWritten {
    /// Destination table name.
    pub table: String,
    /// Source file the table came from.
    pub source: PathBuf,
    /// Total rows inserted across all partitions.
    pub rows: usize,
    /// Number of partitions written (1 for the eager path).
    pub partitions: usize,
}

/// Why a file (or sheet) produced no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension not recognized as a loadable format.
    UnsupportedFormat,
    /// Repair removed every row or every column.
    EmptyAfterRepair,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat => write!(f, "unsupported format"),
            Self::EmptyAfterRepair => write!(f, "empty after repair"),
        }
    }
}

/// A source that was intentionally not loaded.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A source that failed to load. One record per failure site; a workbook
/// can contribute several records for the same path.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// Source file the failure belongs to.
    pub path: PathBuf,
    /// Human-readable failure description.
    pub detail: String,
}

impl FailureRecord {
    pub fn new(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

/// Final accounting for a load session, returned by
/// [`StructuredLoader::close`](crate::loader::StructuredLoader::close).
#[derive(Debug)]
pub struct BatchSummary {
    pub tables: Vec<TableWritten>,
    pub skipped: Vec<SkippedFile>,
    pub failures: Vec<FailureRecord>,
    /// Path of the persisted failure log, when any failure occurred.
    pub failure_log: Option<PathBuf>,
    pub completed_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Total rows written across all tables.
    pub fn rows_written(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}
