//! CSV store round-trip tests: header handling, append-only behavior and
//! the unknown-field sentinel.

use douyin_harvester::sink::{append_row, ensure_store, UNKNOWN};
use std::collections::HashMap;
use std::fs;

const COLUMNS: &[&str] = &["视频ID", "描述", "时长"];

fn row(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

#[test]
fn test_fresh_store_yields_header_plus_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");

    for i in 0..3 {
        let id = format!("id{}", i);
        append_row(&path, COLUMNS, &row(&[("视频ID", &id), ("描述", "d"), ("时长", "1.00秒")]))
            .unwrap();
    }

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][0], "id0");
    assert_eq!(&records[2][0], "id2");
}

#[test]
fn test_missing_optional_field_reads_back_as_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");

    // No duration supplied: the column must read back as the sentinel,
    // never as an empty artifact.
    append_row(&path, COLUMNS, &row(&[("视频ID", "id0"), ("描述", "d")])).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let record = reader.records().next().unwrap().unwrap();
    assert_eq!(&record[2], UNKNOWN);
    assert!(!record[2].is_empty());
}

#[test]
fn test_append_across_calls_never_rewrites_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");

    append_row(&path, COLUMNS, &row(&[("视频ID", "a")])).unwrap();
    append_row(&path, COLUMNS, &row(&[("视频ID", "b")])).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let header_count = content
        .lines()
        .filter(|l| l.starts_with("视频ID"))
        .count();
    assert_eq!(header_count, 1);
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_ensure_store_then_append() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments/123_comments.csv");

    ensure_store(&path, COLUMNS).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);

    append_row(&path, COLUMNS, &row(&[("视频ID", "a")])).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}
