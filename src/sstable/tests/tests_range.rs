use crate::sstable::{builder, SsTable};
use tempfile::tempdir;

fn build(path: &std::path::Path, entries: Vec<(Vec<u8>, Option<Vec<u8>>)>) -> SsTable {
    builder::write(path, entries).unwrap();
    SsTable::open(path, 1_000, 3, 2).unwrap()
}

#[test]
fn range_returns_ascending_inclusive_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0000000000.db");
    let sst = build(
        &path,
        vec![
            (b"a".to_vec(), Some(b"1".to_vec())),
            (b"b".to_vec(), Some(b"2".to_vec())),
            (b"c".to_vec(), Some(b"3".to_vec())),
            (b"d".to_vec(), Some(b"4".to_vec())),
        ],
    );

    let entries = sst.range(b"b", b"c").unwrap();
    assert_eq!(
        entries,
        vec![
            (b"b".to_vec(), Some(b"2".to_vec())),
            (b"c".to_vec(), Some(b"3".to_vec())),
        ]
    );
}

#[test]
fn range_includes_tombstones_as_absent_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0000000000.db");
    let sst = build(
        &path,
        vec![
            (b"a".to_vec(), Some(b"1".to_vec())),
            (b"b".to_vec(), None),
            (b"c".to_vec(), Some(b"3".to_vec())),
        ],
    );

    let entries = sst.range(b"a", b"c").unwrap();
    assert_eq!(
        entries,
        vec![
            (b"a".to_vec(), Some(b"1".to_vec())),
            (b"b".to_vec(), None),
            (b"c".to_vec(), Some(b"3".to_vec())),
        ]
    );
}

#[test]
fn range_start_after_end_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0000000000.db");
    let sst = build(&path, vec![(b"a".to_vec(), Some(b"1".to_vec()))]);

    assert!(sst.range(b"z", b"a").unwrap().is_empty());
}

#[test]
fn range_start_before_smallest_key_uses_first_indexed_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0000000000.db");
    let sst = build(
        &path,
        vec![
            (b"m".to_vec(), Some(b"1".to_vec())),
            (b"n".to_vec(), Some(b"2".to_vec())),
        ],
    );

    let entries = sst.range(b"a", b"n").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, b"m");
}

#[test]
fn range_stops_strictly_after_end_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("0000000000.db");
    let sst = build(
        &path,
        (0..50)
            .map(|i| (format!("k{i:03}").into_bytes(), Some(format!("v{i}").into_bytes())))
            .collect(),
    );

    let entries = sst.range(b"k010", b"k015").unwrap();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries.first().unwrap().0, b"k010");
    assert_eq!(entries.last().unwrap().0, b"k015");
}
