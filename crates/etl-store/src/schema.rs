//! Schema inference: destination DDL derived from frame dtypes.
//!
//! Replace-mode writes recreate the table with a column set matching the
//! current frame. Types come from the frame's dtypes; anything that is not
//! integer or float maps to TEXT.

use polars::prelude::{DataFrame, DataType};

/// SQL column type for a frame dtype.
pub fn sql_type_for(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Boolean => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        _ => "TEXT",
    }
}

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// CREATE TABLE statement matching the frame's columns and dtypes.
pub fn create_table_sql(table: &str, df: &DataFrame) -> String {
    let columns: Vec<String> = df
        .get_columns()
        .iter()
        .map(|col| {
            format!(
                "{} {}",
                quote_ident(col.name().as_str()),
                sql_type_for(col.dtype())
            )
        })
        .collect();
    format!(
        "CREATE TABLE {} ({})",
        quote_ident(table),
        columns.join(", ")
    )
}
