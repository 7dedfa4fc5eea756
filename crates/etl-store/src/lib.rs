pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::StoreError;
pub use schema::{create_table_sql, quote_ident, sql_type_for};
pub use sqlite::{SqliteStore, WriteMode};
