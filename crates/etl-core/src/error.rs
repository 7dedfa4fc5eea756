//! Session-level errors.
//!
//! Per-file failures never surface here; they become
//! [`FailureRecord`](crate::outcome::FailureRecord)s. These errors cover
//! conditions outside the per-file loop: the destination cannot be opened
//! or closed, or the failure log cannot be written.

use std::path::PathBuf;
use thiserror::Error;

use etl_ingest::IngestError;
use etl_store::StoreError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to write failure log {path}: {source}")]
    FailureLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
