use super::helpers::open_default;
use crate::engine::EngineError;

#[test]
fn put_then_read_round_trips() {
    let (_dir, engine) = open_default();
    engine.put(b"k".to_vec(), b"v".to_vec()).unwrap();
    assert_eq!(engine.read(b"k").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn later_put_overwrites_earlier_put() {
    let (_dir, engine) = open_default();
    engine.put(b"k".to_vec(), b"v1".to_vec()).unwrap();
    engine.put(b"k".to_vec(), b"v2".to_vec()).unwrap();
    assert_eq!(engine.read(b"k").unwrap(), Some(b"v2".to_vec()));
}

#[test]
fn repeated_identical_put_is_idempotent() {
    let (_dir, engine) = open_default();
    engine.put(b"k".to_vec(), b"v".to_vec()).unwrap();
    engine.put(b"k".to_vec(), b"v".to_vec()).unwrap();
    assert_eq!(engine.read(b"k").unwrap(), Some(b"v".to_vec()));
}

#[test]
fn put_then_delete_reads_as_absent() {
    let (_dir, engine) = open_default();
    engine.put(b"k".to_vec(), b"v".to_vec()).unwrap();
    engine.delete(b"k".to_vec()).unwrap();
    assert_eq!(engine.read(b"k").unwrap(), None);
}

#[test]
fn read_of_never_written_key_is_absent() {
    let (_dir, engine) = open_default();
    assert_eq!(engine.read(b"missing").unwrap(), None);
}

#[test]
fn empty_key_is_rejected_on_put_and_delete() {
    let (_dir, engine) = open_default();
    assert!(matches!(
        engine.put(Vec::new(), b"v".to_vec()),
        Err(EngineError::EmptyKey)
    ));
    assert!(matches!(
        engine.delete(Vec::new()),
        Err(EngineError::EmptyKey)
    ));
}

#[test]
fn empty_value_is_distinct_from_a_tombstone() {
    let (_dir, engine) = open_default();
    engine.put(b"k".to_vec(), Vec::new()).unwrap();
    assert_eq!(engine.read(b"k").unwrap(), Some(Vec::new()));
}

#[test]
fn batch_put_applies_items_in_order() {
    let (_dir, engine) = open_default();
    engine
        .batch_put(vec![
            (b"a".to_vec(), b"1".to_vec()),
            (b"b".to_vec(), b"2".to_vec()),
            (b"a".to_vec(), b"3".to_vec()),
        ])
        .unwrap();

    assert_eq!(engine.read(b"a").unwrap(), Some(b"3".to_vec()));
    assert_eq!(engine.read(b"b").unwrap(), Some(b"2".to_vec()));
}

#[test]
fn empty_batch_put_is_a_no_op() {
    let (_dir, engine) = open_default();
    engine.batch_put(Vec::new()).unwrap();
}
