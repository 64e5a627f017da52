//! Path-addressed access into a configuration tree.
//!
//! These are the low-level accessors the store and the diff engine are
//! built on. They mutate the tree handed to them; callers clone first when
//! isolation is required.

use crate::error::{value_type_name, StateError, StateResult};
use crate::Path;
use serde_json::{Map, Value};

/// Get a reference to the value at a path.
///
/// Returns `None` as soon as an intermediate node is absent or is not an
/// object. The root path resolves to the tree itself.
///
/// # Examples
///
/// ```
/// use canopy_state::{get_at_path, path};
/// use serde_json::json;
///
/// let tree = json!({"window": {"theme": "dark"}});
/// assert_eq!(get_at_path(&tree, &path!("window", "theme")), Some(&json!("dark")));
/// assert_eq!(get_at_path(&tree, &path!("window", "missing")), None);
/// ```
pub fn get_at_path<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = tree;
    for seg in path.iter() {
        current = current.as_object()?.get(seg)?;
    }
    Some(current)
}

/// Set the value at a path, creating intermediate objects as needed.
///
/// Non-object intermediates (scalars, null) are overwritten by fresh
/// objects. Descending through an array is an error: key paths address
/// object members only.
///
/// Setting at the root path replaces the whole tree.
pub fn set_at_path(tree: &mut Value, path: &Path, value: Value) -> StateResult<()> {
    if path.is_root() {
        *tree = value;
        return Ok(());
    }

    let mut current = tree;
    let mut walked = Path::root();
    let last = path.len() - 1;

    for (i, seg) in path.iter().enumerate() {
        if current.is_array() {
            return Err(StateError::type_mismatch(walked, "object", "array"));
        }
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let obj = current.as_object_mut().unwrap();

        if i == last {
            obj.insert(seg.to_owned(), value);
            return Ok(());
        }
        walked.push(seg);
        current = obj.entry(seg.to_owned()).or_insert(Value::Null);
    }

    unreachable!("non-root path has a final segment")
}

/// Delete the value at a path.
///
/// Returns `true` if a value was removed, `false` if the path did not
/// resolve (including the root path, which cannot be deleted).
pub fn delete_at_path(tree: &mut Value, path: &Path) -> bool {
    let Some(parent_path) = path.parent() else {
        return false;
    };
    let Some(last) = path.last() else {
        return false;
    };

    let mut current = tree;
    for seg in parent_path.iter() {
        let Some(child) = current.as_object_mut().and_then(|obj| obj.get_mut(seg)) else {
            return false;
        };
        current = child;
    }

    current
        .as_object_mut()
        .and_then(|obj| obj.remove(last))
        .is_some()
}

/// Recursively merge `top` into `base`.
///
/// Object nodes are merged key-wise with `top` winning on conflicts; any
/// other pairing replaces the base node wholesale.
///
/// # Examples
///
/// ```
/// use canopy_state::deep_merge;
/// use serde_json::json;
///
/// let mut base = json!({"window": {"theme": "dark", "zoom": 1}});
/// deep_merge(&mut base, json!({"window": {"zoom": 2}, "lang": "en"}));
/// assert_eq!(base, json!({"window": {"theme": "dark", "zoom": 2}, "lang": "en"}));
/// ```
pub fn deep_merge(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base_map), Value::Object(top_map)) => {
            for (key, top_value) in top_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value, top_value),
                    None => {
                        base_map.insert(key, top_value);
                    }
                }
            }
        }
        (base_slot, top_value) => *base_slot = top_value,
    }
}

/// Report whether a value is usable as a whole configuration tree.
///
/// Only object-rooted documents are accepted; sequences and scalars are
/// named in the error for the store's diagnostics.
pub fn check_tree_shape(value: &Value) -> StateResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(StateError::type_mismatch(
            Path::root(),
            "object",
            value_type_name(value),
        ))
    }
}
