//! CLI library components for the structured-file loader.

pub mod logging;
