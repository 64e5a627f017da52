//! Structural diffing and change-record application.
//!
//! `diff` walks two snapshots in parallel and produces the minimal flat
//! [`ChangeRecord`] between them; `apply_changes` replays such a record
//! onto a tree. Both are pure: neither input is ever mutated.

use crate::change::{ChangeEntry, ChangeRecord};
use crate::error::{StateError, StateResult};
use crate::tree::{delete_at_path, set_at_path};
use crate::Path;
use serde_json::Value;

/// Compute the structural difference between two snapshots.
///
/// The walk recurses only through object nodes. Any other mismatch at a
/// node (scalar change, array change, type change) produces a single
/// `Changed` entry at that node's path without descending further. Keys
/// present only in `current` become `Added`; keys present only in
/// `previous` become `Removed`. A wholesale top-level type change lands on
/// the root sentinel path.
///
/// Equal subtrees are skipped entirely, so `diff(t, t)` is empty.
///
/// # Examples
///
/// ```
/// use canopy_state::{diff, path, ChangeEntry};
/// use serde_json::json;
///
/// let previous = json!({"window": {"zoom": 1}, "lang": "en"});
/// let current = json!({"window": {"zoom": 2}});
///
/// let record = diff(&current, &previous);
/// assert_eq!(
///     record.get(&path!("window", "zoom")),
///     Some(&ChangeEntry::changed(json!(2), json!(1)))
/// );
/// assert_eq!(
///     record.get(&path!("lang")),
///     Some(&ChangeEntry::removed(json!("en")))
/// );
/// ```
pub fn diff(current: &Value, previous: &Value) -> ChangeRecord {
    let mut record = ChangeRecord::new();
    diff_node(current, previous, Path::root(), &mut record);
    record
}

fn diff_node(current: &Value, previous: &Value, path: Path, record: &mut ChangeRecord) {
    if current == previous {
        return;
    }

    match (current, previous) {
        (Value::Object(cur), Value::Object(prev)) => {
            for (key, cur_value) in cur {
                match prev.get(key) {
                    Some(prev_value) => {
                        diff_node(cur_value, prev_value, path.child(key), record);
                    }
                    None => {
                        record.insert(path.child(key), ChangeEntry::added(cur_value.clone()));
                    }
                }
            }
            for (key, prev_value) in prev {
                if !cur.contains_key(key) {
                    record.insert(path.child(key), ChangeEntry::removed(prev_value.clone()));
                }
            }
        }
        // Arrays, scalars, and type mismatches are atomic.
        _ => {
            record.insert(
                path,
                ChangeEntry::changed(current.clone(), previous.clone()),
            );
        }
    }
}

/// Apply a change record to a tree, returning the updated tree.
///
/// Pure function: the input tree is cloned, never mutated. A root-sentinel
/// entry short-circuits to its recorded value; otherwise each entry is
/// replayed through the path accessors — `set` for `Added`/`Changed`,
/// `delete` for `Removed`.
///
/// For same-shaped trees `a` and `b`, `apply_changes(&a, &diff(&b, &a))`
/// is structurally equal to `b`.
///
/// `diff` only emits a root entry alone; a deserialized record carrying a
/// root entry next to other paths is ambiguous and rejected.
pub fn apply_changes(tree: &Value, record: &ChangeRecord) -> StateResult<Value> {
    if let Some(root) = record.root_entry() {
        if record.len() > 1 {
            return Err(StateError::invalid_record(
                "root sentinel entry mixed with path entries",
            ));
        }
        return Ok(match root {
            ChangeEntry::Added { value } => value.clone(),
            ChangeEntry::Changed { value, .. } => value.clone(),
            ChangeEntry::Removed { .. } => Value::Null,
        });
    }

    let mut result = tree.clone();
    for (path, entry) in record.iter() {
        match entry {
            ChangeEntry::Added { value } | ChangeEntry::Changed { value, .. } => {
                set_at_path(&mut result, path, value.clone())?;
            }
            ChangeEntry::Removed { .. } => {
                delete_at_path(&mut result, path);
            }
        }
    }
    Ok(result)
}
