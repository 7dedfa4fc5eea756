//! SQLite-backed destination store.
//!
//! One connection per load session, used strictly sequentially. Each frame
//! write runs in its own transaction: replace drops and recreates the
//! table, append inserts into the existing schema.

use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, DataFrame};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use etl_ingest::values::any_to_string;

use crate::error::StoreError;
use crate::schema::{create_table_sql, quote_ident};

/// How a frame lands in the destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Drop and recreate the table with the frame's schema.
    Replace,
    /// Insert into the existing table; frame columns must be a subset of
    /// the table's columns (case-insensitive), missing ones become NULL.
    Append,
}

/// Destination store wrapping a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Destination path this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection. Must be called exactly once per session.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, source)| StoreError::Close(source))
    }

    /// Column names of an existing table, in schema order. Empty when the
    /// table does not exist.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let sql = format!("PRAGMA table_info({})", quote_ident(table));
        let mut stmt = self.conn.prepare(&sql).map_err(|source| StoreError::Write {
            table: table.to_string(),
            source,
        })?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .and_then(|rows| rows.collect::<Result<Vec<String>, _>>())
            .map_err(|source| StoreError::Write {
                table: table.to_string(),
                source,
            })?;
        Ok(names)
    }

    /// Write a frame into `table`, returning the number of rows inserted.
    ///
    /// The caller is expected to skip empty frames; writing one is treated
    /// as a no-op that still recreates the table in replace mode.
    pub fn write_frame(
        &mut self,
        table: &str,
        df: &DataFrame,
        mode: WriteMode,
    ) -> Result<usize, StoreError> {
        let write_err = |source: rusqlite::Error| StoreError::Write {
            table: table.to_string(),
            source,
        };

        // Zero-width frames are the caller's skip case; never emit DDL for them.
        if df.width() == 0 {
            return Ok(0);
        }

        let insert_columns: Vec<String> = match mode {
            WriteMode::Replace => df
                .get_columns()
                .iter()
                .map(|col| col.name().to_string())
                .collect(),
            WriteMode::Append => {
                let existing = self.table_columns(table)?;
                let mut mapped = Vec::with_capacity(df.width());
                for col in df.get_columns() {
                    let name = col.name().as_str();
                    let matched = existing
                        .iter()
                        .find(|candidate| candidate.eq_ignore_ascii_case(name));
                    match matched {
                        Some(existing_name) => mapped.push(existing_name.clone()),
                        None => {
                            return Err(StoreError::SchemaMismatch {
                                table: table.to_string(),
                                column: name.to_string(),
                            });
                        }
                    }
                }
                mapped
            }
        };

        let tx = self.conn.transaction().map_err(write_err)?;
        if mode == WriteMode::Replace {
            tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
                .map_err(write_err)?;
            tx.execute_batch(&create_table_sql(table, df))
                .map_err(write_err)?;
        }

        let mut inserted = 0usize;
        if !insert_columns.is_empty() {
            let column_list: Vec<String> =
                insert_columns.iter().map(|name| quote_ident(name)).collect();
            let placeholders: Vec<&str> = insert_columns.iter().map(|_| "?").collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table),
                column_list.join(", "),
                placeholders.join(", ")
            );
            let mut stmt = tx.prepare(&sql).map_err(write_err)?;
            for row_idx in 0..df.height() {
                let mut values = Vec::with_capacity(df.width());
                for col in df.get_columns() {
                    let value = col.get(row_idx).map_err(|error| StoreError::Frame {
                        message: error.to_string(),
                    })?;
                    values.push(any_to_sql(value));
                }
                stmt.execute(params_from_iter(values)).map_err(write_err)?;
                inserted += 1;
            }
        }
        tx.commit().map_err(write_err)?;

        debug!(table, rows = inserted, mode = ?mode, "frame written");
        Ok(inserted)
    }
}

fn any_to_sql(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(v.to_string())),
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::Boolean(b) => Value::Integer(i64::from(b)),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => Value::Text(any_to_string(other)),
    }
}
