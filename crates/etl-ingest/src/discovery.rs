//! Source tree discovery: recursive, extension-filtered, sorted.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::IngestError;

/// Walk `dir` recursively and return files whose extension matches one of
/// `extensions` (case-insensitive, leading dot optional). Output is sorted
/// so batches are deterministic.
pub fn scan_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let matched = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false);
        if matched {
            files.push(path);
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "source files discovered");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn create_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        for name in &["a.csv", "B.CSV", "book.xlsx", "notes.txt", "nested/deep.csv"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        dir
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = create_tree();
        let files = scan_files(dir.path(), &exts(&[".csv"])).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        }));
    }

    #[test]
    fn dot_prefix_is_optional() {
        let dir = create_tree();
        let with_dot = scan_files(dir.path(), &exts(&[".xlsx"])).unwrap();
        let without = scan_files(dir.path(), &exts(&["xlsx"])).unwrap();
        assert_eq!(with_dot, without);
        assert_eq!(with_dot.len(), 1);
    }

    #[test]
    fn output_is_sorted() {
        let dir = create_tree();
        let files = scan_files(dir.path(), &exts(&["csv", "xlsx", "txt"])).unwrap();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let err = scan_files(Path::new("/nonexistent/tree"), &exts(&["csv"])).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
