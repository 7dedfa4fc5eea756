//! Execution strategy selection: eager vs chunked, by file size.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::IngestError;

/// How a CSV file is read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Whole file decoded and parsed in memory, one replace-mode write.
    Eager,
    /// Fixed-size partitions, replace-then-append writes, all-text columns.
    Chunked,
}

/// File size in megabytes.
pub fn file_size_mb(path: &Path) -> Result<f64, IngestError> {
    let metadata = fs::metadata(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(metadata.len() as f64 / (1024.0 * 1024.0))
}

/// Select the execution strategy for one file.
///
/// Chunked iff the force flag is set or the size strictly exceeds the
/// threshold; a file exactly at the threshold loads eagerly. Evaluated
/// once per file — workbook sheets always parse eagerly regardless.
pub fn select_strategy(
    path: &Path,
    force_chunked: bool,
    threshold_mb: f64,
) -> Result<ExecutionStrategy, IngestError> {
    if force_chunked {
        debug!(path = %path.display(), "chunked execution forced");
        return Ok(ExecutionStrategy::Chunked);
    }
    let size_mb = file_size_mb(path)?;
    let strategy = if size_mb > threshold_mb {
        ExecutionStrategy::Chunked
    } else {
        ExecutionStrategy::Eager
    };
    debug!(
        path = %path.display(),
        size_mb,
        threshold_mb,
        strategy = ?strategy,
        "execution strategy selected"
    );
    Ok(strategy)
}
