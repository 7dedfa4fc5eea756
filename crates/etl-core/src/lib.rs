//! Batch driver: dispatches discovered files to the tabular loaders with
//! per-file failure isolation and a persisted failure log.

pub mod error;
pub mod loader;
pub mod outcome;

pub use error::LoadError;
pub use loader::StructuredLoader;
pub use outcome::{BatchSummary, FailureRecord, SkipReason, SkippedFile, TableWritten};
