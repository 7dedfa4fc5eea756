//! Batch driver for structured-file loading.
//!
//! A [`StructuredLoader`] owns one destination connection for its whole
//! lifetime. Files are processed independently; any per-file failure is
//! recorded and the batch moves on. [`StructuredLoader::close`] persists
//! the failure log, releases the connection exactly once, and returns the
//! session accounting.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use polars::prelude::DataFrame;
use tracing::{debug, error, info, info_span, warn};

use etl_ingest::{
    CsvPartitions, ExecutionStrategy, read_csv_table, read_workbook, repair_table,
    select_strategy,
};
use etl_model::{LoaderConfig, SourceFormat, path_qualifier, sheet_table_name, table_name_for_path};
use etl_store::{SqliteStore, WriteMode};

use crate::error::LoadError;
use crate::outcome::{BatchSummary, FailureRecord, SkipReason, SkippedFile, TableWritten};

/// File name of the sidecar failure log written under the configured log
/// directory.
pub const FAILURE_LOG_NAME: &str = "failed_files.txt";

/// Drives a batch of structured files into one SQLite database.
pub struct StructuredLoader {
    config: LoaderConfig,
    store: SqliteStore,
    claimed: BTreeSet<String>,
    tables: Vec<TableWritten>,
    skipped: Vec<SkippedFile>,
    failures: Vec<FailureRecord>,
}

impl StructuredLoader {
    /// Open the destination database. Failure here is fatal to the batch.
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let store = SqliteStore::open(&config.db_path)?;
        info!(db = %config.db_path.display(), "load session opened");
        Ok(Self {
            config,
            store,
            claimed: BTreeSet::new(),
            tables: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        })
    }

    /// Process every path in order. Failures are recorded, never returned.
    pub fn process_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            self.process_individual_file(path);
        }
    }

    /// Process a single file, isolating its failures from the batch.
    pub fn process_individual_file(&mut self, path: &Path) {
        let span = info_span!("load_file", file = %path.display());
        let _guard = span.enter();

        let Some(format) = SourceFormat::from_path(path) else {
            warn!("unsupported extension, skipping");
            self.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: SkipReason::UnsupportedFormat,
            });
            return;
        };

        let table = self.claim_table_name(path);
        let result = match format {
            SourceFormat::Csv => self.load_csv(path, &table),
            SourceFormat::Xlsx | SourceFormat::Xlsm => {
                self.load_workbook(path, &table);
                Ok(())
            }
        };
        if let Err(record) = result {
            error!(detail = %record.detail, "file failed");
            self.failures.push(record);
        }
    }

    /// Persist the failure log (when any failure occurred), close the
    /// destination connection, and return the session accounting.
    pub fn close(self) -> Result<BatchSummary, LoadError> {
        let Self {
            config,
            store,
            tables,
            skipped,
            failures,
            ..
        } = self;

        let log_result = if failures.is_empty() {
            Ok(None)
        } else {
            persist_failures(&config.log_dir, &failures).map(Some)
        };
        // The connection is released before the log result is inspected so
        // a log write error cannot leave it open.
        store.close()?;
        let failure_log = log_result?;

        info!(
            tables = tables.len(),
            skipped = skipped.len(),
            failures = failures.len(),
            "load session closed"
        );
        Ok(BatchSummary {
            tables,
            skipped,
            failures,
            failure_log,
            completed_at: Utc::now(),
        })
    }

    /// Base table name for a file, qualified with a path hash when another
    /// file in this batch already claimed the same stem.
    fn claim_table_name(&mut self, path: &Path) -> String {
        let base = table_name_for_path(path);
        if self.claimed.contains(&base) && self.config.qualify_collisions {
            let qualified = format!("{base}_{}", path_qualifier(path));
            warn!(
                table = %base,
                qualified = %qualified,
                "table name already claimed in this batch"
            );
            self.claimed.insert(qualified.clone());
            qualified
        } else {
            self.claimed.insert(base.clone());
            base
        }
    }

    fn load_csv(&mut self, path: &Path, table: &str) -> Result<(), FailureRecord> {
        let strategy = select_strategy(path, self.config.force_chunked, self.config.threshold_mb)
            .map_err(|e| failure(path, e))?;
        debug!(strategy = ?strategy, "strategy selected");
        match strategy {
            ExecutionStrategy::Eager => self.load_csv_eager(path, table),
            ExecutionStrategy::Chunked => self.load_csv_chunked(path, table),
        }
    }

    fn load_csv_eager(&mut self, path: &Path, table: &str) -> Result<(), FailureRecord> {
        let raw = read_csv_table(path, &self.config.encodings).map_err(|e| failure(path, e))?;
        let df = repair_table(&raw, true).map_err(|e| failure(path, e))?;
        if frame_is_empty(&df) {
            self.skip_empty(path, table);
            return Ok(());
        }
        let rows = self
            .store
            .write_frame(table, &df, WriteMode::Replace)
            .map_err(|e| failure(path, e))?;
        info!(table, rows, "table written");
        self.tables.push(TableWritten {
            table: table.to_string(),
            source: path.to_path_buf(),
            rows,
            partitions: 1,
        });
        Ok(())
    }

    /// Partitioned CSV load: the first non-empty partition replaces the
    /// table, every later one appends.
    fn load_csv_chunked(&mut self, path: &Path, table: &str) -> Result<(), FailureRecord> {
        let partitions =
            CsvPartitions::open(path, self.config.chunk_bytes).map_err(|e| failure(path, e))?;
        let mut rows_total = 0usize;
        let mut partitions_written = 0usize;
        for partition in partitions {
            let raw = partition.map_err(|e| failure(path, e))?;
            let df = repair_table(&raw, false).map_err(|e| failure(path, e))?;
            if frame_is_empty(&df) {
                continue;
            }
            let mode = if partitions_written == 0 {
                WriteMode::Replace
            } else {
                WriteMode::Append
            };
            let rows = self
                .store
                .write_frame(table, &df, mode)
                .map_err(|e| failure(path, e))?;
            rows_total += rows;
            partitions_written += 1;
            debug!(table, partition = partitions_written, rows, "partition written");
        }
        if partitions_written == 0 {
            self.skip_empty(path, table);
            return Ok(());
        }
        info!(
            table,
            rows = rows_total,
            partitions = partitions_written,
            "table written"
        );
        self.tables.push(TableWritten {
            table: table.to_string(),
            source: path.to_path_buf(),
            rows: rows_total,
            partitions: partitions_written,
        });
        Ok(())
    }

    /// Workbook load: one table per sheet, each sheet isolated from the
    /// others. An unreadable workbook fails the file as a whole.
    fn load_workbook(&mut self, path: &Path, base: &str) {
        let sheets = match read_workbook(path) {
            Ok(sheets) => sheets,
            Err(error) => {
                error!(detail = %error, "workbook failed");
                self.failures.push(failure(path, error));
                return;
            }
        };
        for sheet in sheets {
            let table = sheet_table_name(base, &sheet.name);
            let span = info_span!("load_sheet", sheet = %sheet.name, table = %table);
            let _guard = span.enter();

            let raw = match sheet.table {
                Ok(raw) => raw,
                Err(error) => {
                    error!(detail = %error, "sheet failed");
                    self.failures
                        .push(sheet_failure(path, &sheet.name, error));
                    continue;
                }
            };
            let df = match repair_table(&raw, true) {
                Ok(df) => df,
                Err(error) => {
                    error!(detail = %error, "sheet failed");
                    self.failures
                        .push(sheet_failure(path, &sheet.name, error));
                    continue;
                }
            };
            if frame_is_empty(&df) {
                self.skip_empty(path, &table);
                continue;
            }
            match self.store.write_frame(&table, &df, WriteMode::Replace) {
                Ok(rows) => {
                    info!(table, rows, "table written");
                    self.tables.push(TableWritten {
                        table,
                        source: path.to_path_buf(),
                        rows,
                        partitions: 1,
                    });
                }
                Err(error) => {
                    error!(detail = %error, "sheet failed");
                    self.failures
                        .push(sheet_failure(path, &sheet.name, error));
                }
            }
        }
    }

    fn skip_empty(&mut self, path: &Path, table: &str) {
        info!(table, "no rows survived repair, skipping");
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason: SkipReason::EmptyAfterRepair,
        });
    }
}

fn frame_is_empty(df: &DataFrame) -> bool {
    df.height() == 0 || df.width() == 0
}

fn failure(path: &Path, error: impl fmt::Display) -> FailureRecord {
    FailureRecord::new(path, error.to_string())
}

fn sheet_failure(path: &Path, sheet: &str, error: impl fmt::Display) -> FailureRecord {
    FailureRecord::new(path, format!("sheet {sheet}: {error}"))
}

/// Write the newline-delimited failure log: one line per distinct failed
/// path, in first-failure order.
fn persist_failures(log_dir: &Path, failures: &[FailureRecord]) -> Result<PathBuf, LoadError> {
    fs::create_dir_all(log_dir).map_err(|source| LoadError::FailureLog {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let log_path = log_dir.join(FAILURE_LOG_NAME);
    let mut seen = BTreeSet::new();
    let mut lines = String::new();
    for record in failures {
        let line = record.path.display().to_string();
        if seen.insert(line.clone()) {
            lines.push_str(&line);
            lines.push('\n');
        }
    }
    fs::write(&log_path, lines).map_err(|source| LoadError::FailureLog {
        path: log_path.clone(),
        source,
    })?;
    warn!(log = %log_path.display(), failures = failures.len(), "failure log written");
    Ok(log_path)
}
