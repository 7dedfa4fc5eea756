use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use etl_core::{BatchSummary, StructuredLoader};
use etl_ingest::scan_files;
use etl_model::{LoaderConfig, SourceFormat};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn run_load(args: &RunArgs) -> Result<BatchSummary> {
    let span = info_span!("batch", source = %args.source_dir.display());
    let _guard = span.enter();

    let files =
        scan_files(&args.source_dir, &args.extensions).context("scan source directory")?;
    info!(files = files.len(), "source files discovered");

    let mut loader =
        StructuredLoader::new(loader_config(args)).context("open destination database")?;
    loader.process_files(&files);
    loader.close().context("close load session")
}

pub fn run_formats() {
    let mut table = Table::new();
    table.set_header(vec!["Extension", "Kind"]);
    apply_table_style(&mut table);
    for format in [SourceFormat::Csv, SourceFormat::Xlsx, SourceFormat::Xlsm] {
        let kind = if format.is_workbook() {
            "workbook (one table per sheet)"
        } else {
            "delimited text"
        };
        table.add_row(vec![format.as_str(), kind]);
    }
    println!("{table}");
}

fn loader_config(args: &RunArgs) -> LoaderConfig {
    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| args.source_dir.join("structured.db"));
    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| args.source_dir.join("logs"));
    let mut config = LoaderConfig::new(db_path)
        .with_force_chunked(args.chunked)
        .with_threshold_mb(args.threshold_mb)
        .with_chunk_bytes(args.chunk_mb * 1024 * 1024)
        .with_log_dir(log_dir)
        .with_qualify_collisions(!args.no_qualify_collisions);
    if !args.encodings.is_empty() {
        config = config.with_encodings(args.encodings.clone());
    }
    config
}
