//! Destination table naming.
//!
//! Table names derive deterministically from the source path stem,
//! lower-cased and sanitized to `[a-z0-9_]`. Workbook sheets append the
//! sanitized sheet name. Collisions between files sharing a stem can be
//! disambiguated with a short hash of the full source path.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Derive the base table name for a source file from its path stem.
pub fn table_name_for_path(path: &Path) -> String {
    let stem = path.file_stem().and_then(|v| v.to_str()).unwrap_or("table");
    sanitize(stem)
}

/// Derive the table name for one workbook sheet: `<file_table>_<sheet>`.
pub fn sheet_table_name(file_table: &str, sheet: &str) -> String {
    format!("{file_table}_{}", sanitize(sheet))
}

/// Short qualifier for table-name collisions: first 8 hex chars of the
/// SHA-256 of the full source path.
pub fn path_qualifier(path: &Path) -> String {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    hex::encode(&digest[..4])
}

/// Lower-case and replace anything outside `[a-z0-9_]` with `_`.
///
/// Non-ASCII alphanumerics (e.g. Japanese headers in sheet names) are kept
/// as-is; SQLite identifiers are quoted at the write site.
fn sanitize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() { "table".to_string() } else { out }
}
