//! End-to-end engine scenarios.

use layerkv_core::{CoreError, StorageEngine};
use layerkv_storage::KeyValueStore;

#[test]
fn set_and_get_value() {
    let mut engine = StorageEngine::in_memory();
    engine.put("foo", "123");
    assert_eq!(engine.get("foo").as_deref(), Some("123"));
}

#[test]
fn delete_a_value() {
    let mut engine = StorageEngine::in_memory();
    engine.remove("foo");
    assert_eq!(engine.get("foo"), None);
}

#[test]
fn count_occurrences_of_a_value() {
    let mut engine = StorageEngine::in_memory();
    engine.put("foo", "123");
    engine.put("bar", "456");
    engine.put("baz", "123");

    assert_eq!(engine.count("123"), 2);
    assert_eq!(engine.count("456"), 1);
}

#[test]
fn count_multiple_matching_keys() {
    let mut engine = StorageEngine::in_memory();
    for i in 1..=9 {
        for prefix in ["X", "Y", "Z"] {
            engine.put(&format!("key_{prefix}_{i}"), &format!("value_{i}"));
        }
    }

    assert_eq!(engine.count("value_5"), 3);
    assert_eq!(engine.count("value_7"), 3);
    assert_eq!(engine.count("value_10"), 0);
}

#[test]
fn commit_a_transaction() {
    let mut engine = StorageEngine::in_memory();
    engine.put("bar", "123");

    engine.begin();
    engine.put("foo", "456");
    assert_eq!(engine.get("bar").as_deref(), Some("123"));

    engine.remove("bar");
    assert_eq!(engine.commit(), Ok(()));
    assert_eq!(engine.get("bar"), None);

    assert_eq!(engine.rollback(), Err(CoreError::NoOpenTransaction));
    assert_eq!(engine.get("foo").as_deref(), Some("456"));
}

#[test]
fn rollback_a_transaction() {
    let mut engine = StorageEngine::in_memory();
    engine.put("foo", "123");
    engine.put("bar", "abc");

    engine.begin();
    engine.put("foo", "456");
    assert_eq!(engine.get("foo").as_deref(), Some("456"));
    engine.put("bar", "def");
    assert_eq!(engine.get("bar").as_deref(), Some("def"));

    assert_eq!(engine.rollback(), Ok(()));
    assert_eq!(engine.get("foo").as_deref(), Some("123"));
    assert_eq!(engine.get("bar").as_deref(), Some("abc"));

    assert_eq!(engine.commit(), Err(CoreError::NoOpenTransaction));
}

#[test]
fn nested_transactions() {
    let mut engine = StorageEngine::in_memory();
    engine.put("foo", "123");
    engine.put("bar", "456");
    assert_eq!(engine.count("123"), 1);
    assert_eq!(engine.count("456"), 1);

    engine.begin();
    engine.put("foo", "456");
    engine.begin();
    assert_eq!(engine.count("456"), 2);
    assert_eq!(engine.get("foo").as_deref(), Some("456"));
    assert_eq!(engine.get("bar").as_deref(), Some("456"));

    engine.put("foo", "789");
    assert_eq!(engine.count("456"), 1);
    assert_eq!(engine.get("foo").as_deref(), Some("789"));

    assert_eq!(engine.rollback(), Ok(()));
    assert_eq!(engine.count("456"), 2);
    assert_eq!(engine.get("foo").as_deref(), Some("456"));

    engine.remove("foo");
    assert_eq!(engine.get("foo"), None);
    assert_eq!(engine.get("bar").as_deref(), Some("456"));

    assert_eq!(engine.rollback(), Ok(()));
    assert_eq!(engine.count("123"), 1);
    assert_eq!(engine.count("456"), 1);
    assert_eq!(engine.get("foo").as_deref(), Some("123"));
    assert_eq!(engine.get("bar").as_deref(), Some("456"));
}

#[test]
fn only_outermost_commit_reaches_store() {
    let mut engine = StorageEngine::in_memory();
    engine.put("base", "0");

    engine.begin();
    engine.put("a", "1");
    engine.begin();
    engine.put("b", "2");
    engine.remove("base");
    engine.begin();
    engine.put("c", "3");

    engine.commit().unwrap();
    engine.commit().unwrap();
    assert_eq!(engine.store().size(), 1);
    assert_eq!(engine.store().get("base").as_deref(), Some("0"));

    engine.commit().unwrap();
    assert_eq!(engine.store().get("base"), None);
    assert_eq!(engine.store().get("a").as_deref(), Some("1"));
    assert_eq!(engine.store().get("b").as_deref(), Some("2"));
    assert_eq!(engine.store().get("c").as_deref(), Some("3"));
}

#[test]
fn rollback_after_nested_commit_discards_merged_changes() {
    let mut engine = StorageEngine::in_memory();
    engine.put("foo", "1");

    engine.begin();
    engine.begin();
    engine.put("foo", "2");
    engine.commit().unwrap();
    assert_eq!(engine.get("foo").as_deref(), Some("2"));

    engine.rollback().unwrap();
    assert_eq!(engine.get("foo").as_deref(), Some("1"));
    assert_eq!(engine.count("2"), 0);
}

#[test]
fn clear_with_open_transactions() {
    let mut engine = StorageEngine::in_memory();
    engine.put("foo", "1");
    engine.begin();
    engine.put("bar", "1");

    engine.clear();

    assert!(!engine.in_transaction());
    assert_eq!(engine.count("1"), 0);
    assert_eq!(engine.rollback(), Err(CoreError::NoOpenTransaction));
}
