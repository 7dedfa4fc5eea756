//! CLI argument definitions for the structured-file loader.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use etl_model::DEFAULT_THRESHOLD_MB;

#[derive(Parser)]
#[command(
    name = "etl",
    version,
    about = "Load structured CSV and Excel files into a SQLite database",
    long_about = "Load structured CSV, XLSX, and XLSM files into a SQLite database.\n\n\
                  Each file becomes one table (one table per sheet for workbooks).\n\
                  Headers are repaired, large CSV files are loaded in partitions,\n\
                  and per-file failures never stop the batch."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a directory and load every supported file into one database.
    Run(RunArgs),

    /// List supported source formats.
    Formats,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory scanned recursively for source files.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Destination SQLite database (default: <SOURCE_DIR>/structured.db).
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Always use the partitioned CSV path regardless of file size.
    #[arg(long = "chunked")]
    pub chunked: bool,

    /// File size threshold in MB above which CSV files are partitioned.
    #[arg(long = "threshold-mb", value_name = "MB", default_value_t = DEFAULT_THRESHOLD_MB)]
    pub threshold_mb: f64,

    /// Partition size in MB for the chunked path.
    #[arg(long = "chunk-mb", value_name = "MB", default_value_t = 64)]
    pub chunk_mb: usize,

    /// Encoding tried when decoding CSV files; repeat the flag to build an
    /// ordered fallback list (default: utf-8 only).
    #[arg(long = "encoding", value_name = "LABEL")]
    pub encodings: Vec<String>,

    /// Directory receiving the failure log (default: <SOURCE_DIR>/logs).
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// On table-name collisions, let the later file replace the earlier
    /// table instead of qualifying its name with a path hash.
    #[arg(long = "no-qualify-collisions")]
    pub no_qualify_collisions: bool,

    /// File extensions to load.
    #[arg(
        long = "extension",
        value_name = "EXT",
        default_values_t = ["csv".to_string(), "xlsx".to_string(), "xlsm".to_string()]
    )]
    pub extensions: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
