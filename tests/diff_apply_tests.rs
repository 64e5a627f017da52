//! Diff/apply round-trips and snapshot-isolation properties.

use canopy_state::{apply_changes, diff, get_at_path, path, ChangeEntry, ChangeRecord, Path};
use serde_json::json;

// ============================================================================
// Round-trip properties
// ============================================================================

#[test]
fn test_round_trip_same_shaped_trees() {
    let a = json!({"server": {"host": "localhost", "port": 8080}, "debug": false});
    let b = json!({"server": {"host": "remote", "port": 8080}, "debug": true});

    let forward = diff(&b, &a);
    assert_eq!(apply_changes(&a, &forward).unwrap(), b);

    let backward = diff(&a, &b);
    assert_eq!(apply_changes(&b, &backward).unwrap(), a);
}

#[test]
fn test_round_trip_with_added_and_removed_branches() {
    let a = json!({"keep": {"x": 1}, "drop": {"deep": {"leaf": true}}});
    let b = json!({"keep": {"x": 1}, "grow": {"deep": [1, 2, 3]}});

    let record = diff(&b, &a);
    assert_eq!(apply_changes(&a, &record).unwrap(), b);
    assert_eq!(apply_changes(&b, &record.invert()).unwrap(), a);
}

#[test]
fn test_round_trip_top_level_type_change() {
    let a = json!(null);
    let b = json!({"now": "a tree"});

    let record = diff(&b, &a);
    assert!(record.root_entry().is_some());
    assert_eq!(apply_changes(&a, &record).unwrap(), b);
    assert_eq!(apply_changes(&b, &record.invert()).unwrap(), a);
}

#[test]
fn test_invert_twice_is_identity() {
    let record = diff(
        &json!({"a": 1, "b": {"c": [1, 2]}}),
        &json!({"a": 2, "d": "gone"}),
    );
    assert_eq!(record.invert().invert(), record);
}

// ============================================================================
// Snapshot isolation
// ============================================================================

#[test]
fn test_diff_never_mutates_inputs() {
    let current = json!({"a": {"b": 2}});
    let previous = json!({"a": {"b": 1}, "c": 3});

    let _ = diff(&current, &previous);

    assert_eq!(current, json!({"a": {"b": 2}}));
    assert_eq!(previous, json!({"a": {"b": 1}, "c": 3}));
}

#[test]
fn test_applied_tree_is_independent_of_source() {
    let source = json!({"a": {"b": 1}});
    let record = ChangeRecord::new().with_entry(path!("a", "c"), ChangeEntry::added(json!(2)));

    let mut result = apply_changes(&source, &record).unwrap();
    result["a"]["b"] = json!(999);

    assert_eq!(source, json!({"a": {"b": 1}}));
}

// ============================================================================
// Record semantics
// ============================================================================

#[test]
fn test_record_is_flat_not_nested() {
    let record = diff(
        &json!({"a": {"b": {"c": 2}}}),
        &json!({"a": {"b": {"c": 1}}}),
    );

    assert_eq!(record.len(), 1);
    let (only_path, _) = record.iter().next().unwrap();
    assert_eq!(*only_path, path!("a", "b", "c"));
}

#[test]
fn test_array_element_change_replaces_whole_array() {
    let record = diff(&json!({"xs": [1, 9, 3]}), &json!({"xs": [1, 2, 3]}));
    assert_eq!(
        record.get(&path!("xs")),
        Some(&ChangeEntry::changed(json!([1, 9, 3]), json!([1, 2, 3])))
    );
}

#[test]
fn test_empty_record_applies_as_identity() {
    let tree = json!({"a": {"b": [1, {"c": true}]}});
    assert_eq!(apply_changes(&tree, &ChangeRecord::new()).unwrap(), tree);
}

#[test]
fn test_apply_fails_cleanly_on_array_descend() {
    let tree = json!({"xs": [1, 2]});
    let record =
        ChangeRecord::new().with_entry(path!("xs", "bad"), ChangeEntry::added(json!(0)));
    assert!(apply_changes(&tree, &record).is_err());
}

#[test]
fn test_removed_root_applies_to_null() {
    let record = ChangeRecord::new().with_entry(Path::root(), ChangeEntry::removed(json!({"a": 1})));
    let result = apply_changes(&json!({"a": 1}), &record).unwrap();
    assert!(result.is_null());
}

#[test]
fn test_deep_tree_round_trip() {
    // A config-sized document with every value kind in play.
    let previous = json!({
        "editor": {"font": {"family": "mono", "size": 12}, "wrap": true},
        "keymap": {"bindings": [{"key": "ctrl+s", "cmd": "save"}]},
        "telemetry": null
    });
    let current = json!({
        "editor": {"font": {"family": "mono", "size": 14}, "wrap": true},
        "keymap": {"bindings": [{"key": "ctrl+s", "cmd": "save_all"}]},
        "workspace": {"root": "/srv"}
    });

    let record = diff(&current, &previous);
    assert_eq!(
        record.get(&path!("editor", "font", "size")),
        Some(&ChangeEntry::changed(json!(14), json!(12)))
    );
    assert!(record.contains(&path!("keymap", "bindings")));
    assert_eq!(
        record.get(&path!("telemetry")),
        Some(&ChangeEntry::removed(json!(null)))
    );

    let rebuilt = apply_changes(&previous, &record).unwrap();
    assert_eq!(rebuilt, current);
    assert_eq!(
        get_at_path(&rebuilt, &path!("workspace", "root")),
        Some(&json!("/srv"))
    );

    assert_eq!(apply_changes(&current, &record.invert()).unwrap(), previous);
}
