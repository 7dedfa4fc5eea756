//! Error types for tabular ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading structured source files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to walk the source directory.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to read a source file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No configured text encoding could decode the file.
    #[error("no configured encoding decodes {path} (tried: {})", tried.join(", "))]
    Decode { path: PathBuf, tried: Vec<String> },

    /// An encoding label in the configuration is not recognized.
    #[error("unknown encoding label '{label}'")]
    UnknownEncoding { label: String },

    /// Malformed CSV structure.
    #[error("failed to parse CSV {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Corrupt or unreadable workbook.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Failed to assemble a frame from repaired rows.
    #[error("failed to build frame: {message}")]
    Frame { message: String },
}
