//! Hierarchical configuration state engine.
//!
//! `canopy-state` holds a nested key/value configuration tree, supports
//! path-addressed reads and writes, computes minimal structural diffs
//! between successive versions of the tree, replays and inverts those
//! diffs for undo/redo, and notifies subscribers when a path (or any of
//! its descendants) changes.
//!
//! # Core Concepts
//!
//! - **Snapshot**: the whole tree at one instant (`serde_json::Value`);
//!   everything crossing the store boundary is a deep copy
//! - **[`Path`]**: a dot-separated address into a snapshot (`a.b.c`)
//! - **[`ChangeRecord`]**: a flat map from path to a self-invertible
//!   [`ChangeEntry`] describing how one snapshot differs from another
//! - **[`History`]**: a bounded, cursor-addressed stack of change records
//! - **[`ConfigStore`]**: the façade that owns the snapshots and drives
//!   diffing, history, validation, and notification
//!
//! # Quick Start
//!
//! ```
//! use canopy_state::{ConfigStore, path};
//! use serde_json::json;
//!
//! let mut store = ConfigStore::new();
//! store.initialize(Some(json!({"x": {"y": 1}})));
//!
//! store.set_value("x.y", json!(2));
//! assert_eq!(store.value("x.y"), Some(json!(2)));
//! assert!(store.changes().contains(&path!("x", "y")));
//!
//! store.undo();
//! assert_eq!(store.value("x.y"), Some(json!(1)));
//! store.redo();
//! assert_eq!(store.value("x.y"), Some(json!(2)));
//! ```
//!
//! # Diff and apply as pure functions
//!
//! ```
//! use canopy_state::{apply_changes, diff};
//! use serde_json::json;
//!
//! let older = json!({"a": 1});
//! let newer = json!({"a": 2, "b": true});
//!
//! let record = diff(&newer, &older);
//! assert_eq!(apply_changes(&older, &record).unwrap(), newer);
//! assert_eq!(apply_changes(&newer, &record.invert()).unwrap(), older);
//! ```
//!
//! The store runs single-threaded and synchronous: every operation runs to
//! completion, listeners fire in registration order after the mutation has
//! committed, and a panicking listener is isolated and logged. The crate
//! performs no I/O; persistence and transport belong to the caller.

mod change;
mod diff;
mod error;
mod history;
mod listener;
mod path;
mod store;
mod tree;
mod validate;

// Core types
pub use change::{ChangeEntry, ChangeOrigin, ChangeRecord};
pub use diff::{apply_changes, diff};
pub use error::{value_type_name, StateError, StateResult};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use listener::{GlobalListener, ListenerRegistry, PathListener, SubscriberId};
pub use path::Path;
pub use tree::{check_tree_shape, deep_merge, delete_at_path, get_at_path, set_at_path};

// Store types
pub use store::{ConfigStore, DefaultProvider, Write};
pub use validate::{looks_like_report, ValidationIssue, ValidationReport, Validator};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
