use super::helpers::{open_with_watermark, sstable_file_names};

/// A name matches the canonical `\d{10}\.db` pattern: exactly ten ASCII
/// digits followed by the `.db` extension.
fn is_canonical_sstable_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".db") else {
        return false;
    };
    stem.len() == 10 && stem.bytes().all(|b| b.is_ascii_digit())
}

/// Scenario B — enough writes past a low watermark produce at least one
/// `\d{10}\.db` SSTable file.
#[test]
fn flush_triggers_sstable_file_with_canonical_name() {
    let (dir, engine) = open_with_watermark(512);
    for i in 0..150 {
        engine
            .put(format!("key-{i}").into_bytes(), format!("value-{i}").into_bytes())
            .unwrap();
    }

    let names = sstable_file_names(&dir);
    assert!(!names.is_empty(), "expected at least one flushed SSTable");

    for name in &names {
        assert!(is_canonical_sstable_name(name), "unexpected SSTable file name: {name}");
    }
}

#[test]
fn sstable_sequence_numbers_increase_monotonically() {
    let (dir, engine) = open_with_watermark(32);
    for i in 0..30 {
        engine
            .put(format!("k{i:03}").into_bytes(), format!("v{i}").into_bytes())
            .unwrap();
    }

    let mut sequences: Vec<u64> = sstable_file_names(&dir)
        .iter()
        .map(|name| name.trim_end_matches(".db").parse().unwrap())
        .collect();
    sequences.sort();
    let mut previous = None;
    for seq in sequences.drain(..) {
        if let Some(prev) = previous {
            assert!(seq > prev);
        }
        previous = Some(seq);
    }
}

/// A single very large value that exceeds the watermark on its own forces
/// an immediate flush right after its insertion.
#[test]
fn oversized_single_value_forces_immediate_flush() {
    let (dir, engine) = open_with_watermark(1024);
    let huge_value = vec![0xABu8; 4096];
    engine.put(b"huge".to_vec(), huge_value.clone()).unwrap();

    assert!(!sstable_file_names(&dir).is_empty());
    assert_eq!(engine.read(b"huge").unwrap(), Some(huge_value));
}
