//! Change records: the minimal structural difference between two snapshots.
//!
//! A [`ChangeRecord`] maps paths to self-invertible [`ChangeEntry`] values.
//! Every entry carries enough data to undo itself, so inverting a record
//! never has to consult the trees it was computed from.

use crate::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// One structural change at a single path.
///
/// Entries are self-invertible: `Added` remembers the new value, `Removed`
/// the old one, and `Changed` both, so [`ChangeEntry::invert`] is total.
///
/// The serialized form uses a `type` tag with `value`/`oldValue` fields:
///
/// ```
/// use canopy_state::ChangeEntry;
/// use serde_json::json;
///
/// let entry = ChangeEntry::changed(json!(2), json!(1));
/// let wire = serde_json::to_value(&entry).unwrap();
/// assert_eq!(wire, json!({"type": "changed", "value": 2, "oldValue": 1}));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChangeEntry {
    /// A value that exists only in the newer snapshot.
    Added {
        /// The value that was added.
        value: Value,
    },

    /// A value present in both snapshots with different content.
    Changed {
        /// The new value.
        value: Value,
        /// The value it replaced.
        #[serde(rename = "oldValue")]
        old_value: Value,
    },

    /// A value that exists only in the older snapshot.
    Removed {
        /// The value that was removed.
        #[serde(rename = "oldValue")]
        old_value: Value,
    },
}

impl ChangeEntry {
    /// Create an `Added` entry.
    #[inline]
    pub fn added(value: impl Into<Value>) -> Self {
        ChangeEntry::Added {
            value: value.into(),
        }
    }

    /// Create a `Changed` entry.
    #[inline]
    pub fn changed(value: impl Into<Value>, old_value: impl Into<Value>) -> Self {
        ChangeEntry::Changed {
            value: value.into(),
            old_value: old_value.into(),
        }
    }

    /// Create a `Removed` entry.
    #[inline]
    pub fn removed(old_value: impl Into<Value>) -> Self {
        ChangeEntry::Removed {
            old_value: old_value.into(),
        }
    }

    /// The value after the change, if the change left one in place.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        match self {
            ChangeEntry::Added { value } => Some(value),
            ChangeEntry::Changed { value, .. } => Some(value),
            ChangeEntry::Removed { .. } => None,
        }
    }

    /// The value before the change, if there was one.
    #[inline]
    pub fn old_value(&self) -> Option<&Value> {
        match self {
            ChangeEntry::Added { .. } => None,
            ChangeEntry::Changed { old_value, .. } => Some(old_value),
            ChangeEntry::Removed { old_value } => Some(old_value),
        }
    }

    /// The entry's tag name (`added`, `changed`, `removed`).
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEntry::Added { .. } => "added",
            ChangeEntry::Changed { .. } => "changed",
            ChangeEntry::Removed { .. } => "removed",
        }
    }

    /// The entry that exactly undoes this one.
    pub fn invert(&self) -> ChangeEntry {
        match self {
            ChangeEntry::Added { value } => ChangeEntry::Removed {
                old_value: value.clone(),
            },
            ChangeEntry::Changed { value, old_value } => ChangeEntry::Changed {
                value: old_value.clone(),
                old_value: value.clone(),
            },
            ChangeEntry::Removed { old_value } => ChangeEntry::Added {
                value: old_value.clone(),
            },
        }
    }
}

/// What kind of store operation committed a change.
///
/// Passed to global listeners so they can distinguish, say, an undo from a
/// fresh write without inspecting the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrigin {
    /// Initial state load.
    Initialize,
    /// A path-scoped set.
    Set,
    /// A whole-tree replace.
    Replace,
    /// A whole-tree deep merge.
    Merge,
    /// History moved backwards.
    Undo,
    /// History moved forwards.
    Redo,
}

/// A map from [`Path`] to [`ChangeEntry`] describing how one snapshot
/// differs from another.
///
/// Records are ordered by path, serialize as a plain JSON object keyed by
/// dotted path strings (the root sentinel `$` included), and are treated
/// as immutable once committed to the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeRecord(BTreeMap<Path, ChangeEntry>);

impl ChangeRecord {
    /// Create an empty record.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    #[inline]
    pub fn with_entry(mut self, path: Path, entry: ChangeEntry) -> Self {
        self.0.insert(path, entry);
        self
    }

    /// Insert an entry at a path.
    #[inline]
    pub fn insert(&mut self, path: Path, entry: ChangeEntry) {
        self.0.insert(path, entry);
    }

    /// Get the entry at a path.
    #[inline]
    pub fn get(&self, path: &Path) -> Option<&ChangeEntry> {
        self.0.get(path)
    }

    /// Get the entry at the reserved root sentinel, if any.
    ///
    /// A root entry marks a wholesale top-level change and short-circuits
    /// application of the rest of the record.
    #[inline]
    pub fn root_entry(&self) -> Option<&ChangeEntry> {
        self.0.get(&Path::root())
    }

    /// True if the record describes a changed path.
    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains_key(path)
    }

    /// Number of changed paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(path, entry)` pairs in path order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &ChangeEntry)> {
        self.0.iter()
    }

    /// Iterate over the changed paths in path order.
    #[inline]
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.0.keys()
    }

    /// The record that exactly undoes this one.
    ///
    /// Every entry is inverted in place; applying the result to the newer
    /// snapshot reproduces the older one.
    pub fn invert(&self) -> ChangeRecord {
        ChangeRecord(
            self.0
                .iter()
                .map(|(path, entry)| (path.clone(), entry.invert()))
                .collect(),
        )
    }
}

impl FromIterator<(Path, ChangeEntry)> for ChangeRecord {
    fn from_iter<I: IntoIterator<Item = (Path, ChangeEntry)>>(iter: I) -> Self {
        ChangeRecord(iter.into_iter().collect())
    }
}

impl IntoIterator for ChangeRecord {
    type Item = (Path, ChangeEntry);
    type IntoIter = btree_map::IntoIter<Path, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeRecord {
    type Item = (&'a Path, &'a ChangeEntry);
    type IntoIter = btree_map::Iter<'a, Path, ChangeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
