//! Append-only CSV record sink.
//!
//! Every store has a fixed ordered column list. The header is written the
//! first time a store is touched (file absent or empty); after that rows are
//! only ever appended. Missing fields are written as the `未知` sentinel so a
//! row always has every column populated.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Sentinel written for any column the row does not supply.
pub const UNKNOWN: &str = "未知";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn open_appending(path: &Path, columns: &[&str]) -> Result<csv::Writer<fs::File>, SinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if size == 0 {
        writer.write_record(columns)?;
        writer.flush()?;
    }

    Ok(writer)
}

/// Create the store with its header if it does not exist yet. Used for
/// comment stores, which get a header even when a thread yields no comments.
pub fn ensure_store(path: &Path, columns: &[&str]) -> Result<(), SinkError> {
    let mut writer = open_appending(path, columns)?;
    writer.flush()?;
    Ok(())
}

/// Append exactly one row, writing the header first when the store is fresh.
/// Fields absent from `row` are written as [`UNKNOWN`].
pub fn append_row(
    path: &Path,
    columns: &[&str],
    row: &HashMap<&str, String>,
) -> Result<(), SinkError> {
    let mut writer = open_appending(path, columns)?;

    let record: Vec<&str> = columns
        .iter()
        .map(|col| row.get(col).map(String::as_str).unwrap_or(UNKNOWN))
        .collect();

    writer.write_record(&record)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");
        let columns = &["a", "b"];

        for i in 0..3 {
            let mut row = HashMap::new();
            row.insert("a", format!("v{}", i));
            row.insert("b", "x".to_string());
            append_row(&path, columns, &row).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "a,b");
        assert_eq!(lines[1], "v0,x");
        assert_eq!(lines[3], "v2,x");
    }

    #[test]
    fn test_missing_field_becomes_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");

        let mut row = HashMap::new();
        row.insert("a", "present".to_string());
        append_row(&path, &["a", "b", "c"], &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], format!("present,{},{}", UNKNOWN, UNKNOWN));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.csv");
        append_row(&path, &["a"], &HashMap::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_ensure_store_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comments.csv");
        ensure_store(&path, &["昵称", "评论"]).unwrap();
        ensure_store(&path, &["昵称", "评论"]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert_eq!(content.lines().next().unwrap(), "昵称,评论");
    }

    #[test]
    fn test_column_order_fixed_regardless_of_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");

        let mut row = HashMap::new();
        row.insert("b", "2".to_string());
        row.insert("a", "1".to_string());
        append_row(&path, &["a", "b"], &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().nth(1).unwrap(), "1,2");
    }
}
