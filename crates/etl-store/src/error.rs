//! Error types for the SQLite destination store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while persisting frames.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Destination database could not be opened. Fatal for the session.
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A write was rejected by the destination.
    #[error("failed to write table '{table}': {source}")]
    Write {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Append-mode frame carries a column the destination table lacks.
    #[error("append to '{table}' rejected: column '{column}' not in destination schema")]
    SchemaMismatch { table: String, column: String },

    /// Failed to read a value out of the frame.
    #[error("failed to read frame value: {message}")]
    Frame { message: String },

    /// Closing the connection failed.
    #[error("failed to close database: {0}")]
    Close(#[source] rusqlite::Error),
}
