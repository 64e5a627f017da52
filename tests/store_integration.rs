//! Cross-component scenarios driving the store end to end.

use canopy_state::{path, ChangeEntry, ChangeOrigin, ConfigStore, Path, Value};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[test]
fn test_end_to_end_edit_undo_redo() {
    let mut store = ConfigStore::new();
    assert!(store.initialize(Some(json!({"x": {"y": 1}}))));

    assert!(store.set_value("x.y", json!(2)));

    // The change record serializes exactly as observers expect it.
    let wire = serde_json::to_value(store.changes()).unwrap();
    assert_eq!(
        wire,
        json!({"x.y": {"type": "changed", "value": 2, "oldValue": 1}})
    );

    assert!(store.undo());
    assert_eq!(store.value("x.y"), Some(json!(1)));

    assert!(store.redo());
    assert_eq!(store.value("x.y"), Some(json!(2)));
}

#[test]
fn test_malformed_input_rejection() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"keep": true})));

    assert!(!store.replace_state(json!([1, 2, 3])));
    assert!(!store.replace_state(json!("scalar")));
    assert!(!store.merge_state(json!(null)));
    assert!(!store.replace_state(json!({"isValid": true, "errors": []})));

    assert_eq!(store.state(), json!({"keep": true}));
}

#[test]
fn test_ancestor_propagation_with_fresh_subtree() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"a": {}})));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe_path("a", move |value: &Value, _: &Path| {
        sink.lock().unwrap().push(value.clone());
    });

    // Creates the whole b.c branch under the subscribed path.
    store.set_value("a.b.c", json!(5));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), [json!({"b": {"c": 5}})]);
}

#[test]
fn test_notification_order_global_then_paths() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"a": {"b": 1}})));

    let order = Arc::new(Mutex::new(Vec::new()));

    let sink = order.clone();
    store.subscribe(move |_, _, _| sink.lock().unwrap().push("global".to_string()));

    let sink = order.clone();
    store.subscribe_path("a.b", move |_: &Value, p: &Path| {
        sink.lock().unwrap().push(p.to_string())
    });
    let sink = order.clone();
    store.subscribe_path("a", move |_: &Value, p: &Path| {
        sink.lock().unwrap().push(p.to_string())
    });

    store.set_value("a.b", json!(2));

    // Global first, then path listeners bottom-up.
    assert_eq!(*order.lock().unwrap(), ["global", "a.b", "a"]);
}

#[test]
fn test_history_bound_drops_oldest_entries() {
    let bound = 4;
    let mut store = ConfigStore::new().with_history_limit(bound);
    store.initialize(Some(json!({"n": 0})));

    for n in 1..=(bound + 5) {
        assert!(store.set_value("n", json!(n)));
    }
    assert_eq!(store.history_len(), bound);

    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, bound);
    // The oldest writes fell off the front and are unreachable.
    assert_eq!(store.value("n"), Some(json!(5)));
}

#[test]
fn test_undo_after_replace_restores_whole_subtrees() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({
        "server": {"host": "localhost", "port": 8080},
        "plugins": ["a", "b"]
    })));

    assert!(store.replace_state(json!({"server": {"host": "remote"}})));
    assert_eq!(store.value("plugins"), None);

    assert!(store.undo());
    assert_eq!(store.value("server.port"), Some(json!(8080)));
    assert_eq!(store.value("plugins"), Some(json!(["a", "b"])));

    assert!(store.redo());
    assert_eq!(store.value("server.host"), Some(json!("remote")));
    assert_eq!(store.value("server.port"), None);
}

#[test]
fn test_undo_is_observable_like_any_commit() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"v": 1})));
    store.set_value("v", json!(2));

    let origins = Arc::new(Mutex::new(Vec::new()));
    let sink = origins.clone();
    store.subscribe(move |_, changes, origin| {
        assert!(changes.is_some());
        sink.lock().unwrap().push(origin);
    });

    store.undo();
    store.redo();

    assert_eq!(
        *origins.lock().unwrap(),
        [ChangeOrigin::Undo, ChangeOrigin::Redo]
    );
}

#[test]
fn test_changes_after_undo_report_the_inverse() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"x": 1})));
    store.set_value("x", json!(2));

    store.undo();
    assert_eq!(
        store.changes().get(&path!("x")),
        Some(&ChangeEntry::changed(json!(1), json!(2)))
    );
}

#[test]
fn test_noop_write_fires_no_listeners() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"a": 1})));

    let count = Arc::new(Mutex::new(0));
    let sink = count.clone();
    store.subscribe(move |_, _, _| *sink.lock().unwrap() += 1);

    assert!(store.set_value("a", json!(1)));
    assert_eq!(*count.lock().unwrap(), 0);
    assert!(store.changes().is_empty());

    // The previous-snapshot bookkeeping still advanced.
    assert_eq!(store.previous_state(), json!({"a": 1}));
}

#[test]
fn test_mixed_write_kinds_share_one_history() {
    let mut store = ConfigStore::new();
    store.initialize(Some(json!({"a": 1})));

    store.set_value("b", json!(2));
    store.merge_state(json!({"c": {"d": 3}}));
    store.replace_state(json!({"a": 1}));

    assert_eq!(store.history_len(), 3);

    store.undo();
    assert_eq!(store.value("c.d"), Some(json!(3)));
    store.undo();
    assert_eq!(store.value("c"), None);
    assert_eq!(store.value("b"), Some(json!(2)));
    store.undo();
    assert_eq!(store.state(), json!({"a": 1}));
}
