//! End-to-end batch driver behavior against a real SQLite file.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use etl_core::{SkipReason, StructuredLoader};
use etl_model::LoaderConfig;

fn config_for(dir: &TempDir) -> LoaderConfig {
    LoaderConfig::new(dir.path().join("out.db")).with_log_dir(dir.path().join("logs"))
}

fn table_names(db: &Path) -> Vec<String> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

fn row_count(db: &Path, table: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn failed_file_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let good_a = dir.path().join("alpha.csv");
    let bad = dir.path().join("broken.csv");
    let good_b = dir.path().join("gamma.csv");
    fs::write(&good_a, "id,name\n1,ada\n2,grace\n").unwrap();
    // Invalid UTF-8 with no fallback encoding configured.
    fs::write(&bad, b"id,name\n1,\xff\xfe\n").unwrap();
    fs::write(&good_b, "id,name\n3,edsger\n").unwrap();

    let config = config_for(&dir);
    let db = config.db_path.clone();
    let mut loader = StructuredLoader::new(config).unwrap();
    loader.process_files(&[good_a, bad.clone(), good_b]);
    let summary = loader.close().unwrap();

    assert_eq!(table_names(&db), vec!["alpha", "gamma"]);
    assert_eq!(row_count(&db, "alpha"), 2);
    assert_eq!(row_count(&db, "gamma"), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, bad);

    let log = summary.failure_log.expect("failure log should exist");
    let contents = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![bad.display().to_string().as_str()]);
}

#[test]
fn no_failures_means_no_failure_log() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("only.csv");
    fs::write(&file, "a,b\n1,2\n").unwrap();

    let config = config_for(&dir);
    let log_dir = config.log_dir.clone();
    let mut loader = StructuredLoader::new(config).unwrap();
    loader.process_files(&[file]);
    let summary = loader.close().unwrap();

    assert!(!summary.has_failures());
    assert!(summary.failure_log.is_none());
    assert!(!log_dir.join("failed_files.txt").exists());
}

#[test]
fn header_only_file_is_skipped_without_a_table() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("empty.csv");
    fs::write(&file, "a,b,c\n").unwrap();

    let config = config_for(&dir);
    let db = config.db_path.clone();
    let mut loader = StructuredLoader::new(config).unwrap();
    loader.process_files(&[file.clone()]);
    let summary = loader.close().unwrap();

    assert!(table_names(&db).is_empty());
    assert!(!summary.has_failures());
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, file);
    assert_eq!(summary.skipped[0].reason, SkipReason::EmptyAfterRepair);
}

#[test]
fn unsupported_extension_is_skipped_not_failed() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "not tabular\n").unwrap();

    let config = config_for(&dir);
    let db = config.db_path.clone();
    let mut loader = StructuredLoader::new(config).unwrap();
    loader.process_files(&[file]);
    let summary = loader.close().unwrap();

    assert!(table_names(&db).is_empty());
    assert!(!summary.has_failures());
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].reason, SkipReason::UnsupportedFormat);
}

#[test]
fn colliding_stems_get_qualified_table_names() {
    let dir = TempDir::new().unwrap();
    let one = dir.path().join("one");
    let two = dir.path().join("two");
    fs::create_dir_all(&one).unwrap();
    fs::create_dir_all(&two).unwrap();
    let first = one.join("report.csv");
    let second = two.join("report.csv");
    fs::write(&first, "a\n1\n").unwrap();
    fs::write(&second, "a\n2\n3\n").unwrap();

    let config = config_for(&dir);
    let db = config.db_path.clone();
    let mut loader = StructuredLoader::new(config).unwrap();
    loader.process_files(&[first, second]);
    let summary = loader.close().unwrap();

    let tables = table_names(&db);
    assert_eq!(tables.len(), 2);
    assert!(tables.contains(&"report".to_string()));
    let qualified = tables.iter().find(|t| t.as_str() != "report").unwrap();
    assert!(qualified.starts_with("report_"));
    assert_eq!(row_count(&db, "report"), 1);
    assert_eq!(row_count(&db, qualified), 2);
    assert_eq!(summary.tables.len(), 2);
}

#[test]
fn chunked_and_eager_loads_produce_the_same_rows() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("data.csv");
    let mut contents = String::from("id,word\n");
    for i in 0..40 {
        contents.push_str(&format!("{i},word_{i}\n"));
    }
    fs::write(&file, contents).unwrap();

    let eager_db = dir.path().join("eager.db");
    let chunked_db = dir.path().join("chunked.db");

    let mut loader = StructuredLoader::new(
        LoaderConfig::new(&eager_db).with_log_dir(dir.path().join("logs")),
    )
    .unwrap();
    loader.process_files(std::slice::from_ref(&file));
    loader.close().unwrap();

    let mut loader = StructuredLoader::new(
        LoaderConfig::new(&chunked_db)
            .with_log_dir(dir.path().join("logs"))
            .with_force_chunked(true)
            .with_chunk_bytes(64),
    )
    .unwrap();
    loader.process_files(std::slice::from_ref(&file));
    let summary = loader.close().unwrap();

    // 64-byte partitions force several append writes.
    assert!(summary.tables[0].partitions > 1);
    assert_eq!(row_count(&eager_db, "data"), 40);
    assert_eq!(row_count(&chunked_db, "data"), 40);

    let read_all = |db: &PathBuf| -> Vec<(String, String)> {
        let conn = Connection::open(db).unwrap();
        let mut stmt = conn
            .prepare("SELECT CAST(id AS TEXT), word FROM \"data\" ORDER BY CAST(id AS INTEGER)")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    };
    assert_eq!(read_all(&eager_db), read_all(&chunked_db));
}
