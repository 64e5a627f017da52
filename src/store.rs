//! The configuration state store.
//!
//! [`ConfigStore`] is the façade callers interact with: it owns the
//! current and previous snapshots, routes writes through the path
//! accessors, records structural diffs for observability and undo/redo,
//! and drives listener notification. All other modules are its internals.
//!
//! The store is a plain value constructed and passed explicitly; any
//! debug hook is an attached subscriber, never an ambient global.

use crate::change::{ChangeOrigin, ChangeRecord};
use crate::diff::{apply_changes, diff};
use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::listener::{GlobalListener, ListenerRegistry, PathListener, SubscriberId};
use crate::tree::{check_tree_shape, deep_merge, get_at_path, set_at_path};
use crate::validate::{looks_like_report, Validator};
use crate::Path;
use serde_json::Value;
use std::sync::Arc;

/// Zero-argument source of a default snapshot, consulted when
/// [`ConfigStore::initialize`] receives no initial state.
pub type DefaultProvider = Arc<dyn Fn() -> Value + Send + Sync>;

/// A write request against the store.
///
/// The write API is a tagged union rather than one overloaded entry point,
/// so merge-versus-replace intent is always explicit and the store never
/// has to sniff the shape of its argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    /// Set the value at one path.
    Set {
        /// Target path.
        path: Path,
        /// Value to set.
        value: Value,
    },

    /// Replace the whole tree.
    Replace {
        /// The new tree; must be object-rooted.
        tree: Value,
    },

    /// Deep-merge a tree over the current one.
    Merge {
        /// The overlay; must be object-rooted.
        tree: Value,
    },
}

impl Write {
    /// Create a path-scoped set.
    #[inline]
    pub fn set(path: impl Into<Path>, value: impl Into<Value>) -> Self {
        Write::Set {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Create a whole-tree replace.
    #[inline]
    pub fn replace(tree: impl Into<Value>) -> Self {
        Write::Replace { tree: tree.into() }
    }

    /// Create a whole-tree deep merge.
    #[inline]
    pub fn merge(tree: impl Into<Value>) -> Self {
        Write::Merge { tree: tree.into() }
    }
}

/// Hierarchical configuration state store.
///
/// Owns the current snapshot and the immediately preceding one, a bounded
/// undo/redo history of change records, and the listener registry. Every
/// value crossing the store boundary is a deep copy: callers can mutate
/// whatever the store hands them without corrupting internal state, and
/// vice versa.
///
/// Writes never return errors; rejected or failed writes log a diagnostic
/// and return `false`, leaving the state untouched.
///
/// # Examples
///
/// ```
/// use canopy_state::ConfigStore;
/// use serde_json::json;
///
/// let mut store = ConfigStore::new();
/// store.initialize(Some(json!({"window": {"zoom": 1}})));
///
/// assert!(store.set_value("window.zoom", json!(2)));
/// assert_eq!(store.value("window.zoom"), Some(json!(2)));
///
/// assert!(store.undo());
/// assert_eq!(store.value("window.zoom"), Some(json!(1)));
/// ```
pub struct ConfigStore {
    current: Value,
    previous: Value,
    changes: ChangeRecord,
    history: History,
    listeners: ListenerRegistry,
    validator: Option<Arc<dyn Validator>>,
    defaults: Option<DefaultProvider>,
}

impl ConfigStore {
    /// Create a store holding an empty tree.
    pub fn new() -> Self {
        Self {
            current: Value::Object(Default::default()),
            previous: Value::Object(Default::default()),
            changes: ChangeRecord::new(),
            history: History::new(DEFAULT_HISTORY_LIMIT),
            listeners: ListenerRegistry::new(),
            validator: None,
            defaults: None,
        }
    }

    /// Set the undo/redo history bound (builder pattern).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = History::new(limit);
        self
    }

    /// Attach an external validator (builder pattern).
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Attach a default-snapshot provider (builder pattern).
    pub fn with_defaults(mut self, provider: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.defaults = Some(Arc::new(provider));
        self
    }

    /// Load an initial snapshot, falling back to the default provider.
    ///
    /// Shape rules are the same as for [`ConfigStore::replace_state`].
    /// Validation failures are logged but do not refuse the state.
    /// Any existing undo/redo history is dropped.
    pub fn initialize(&mut self, initial: Option<Value>) -> bool {
        let tree = match initial {
            Some(tree) => tree,
            None => match &self.defaults {
                Some(provider) => provider(),
                None => Value::Object(Default::default()),
            },
        };

        if !self.accept_tree(&tree) {
            return false;
        }

        self.history.clear();
        self.commit(tree, ChangeOrigin::Initialize, false)
    }

    /// A deep copy of the current snapshot.
    pub fn state(&self) -> Value {
        self.current.clone()
    }

    /// A deep copy of the snapshot before the last accepted write.
    pub fn previous_state(&self) -> Value {
        self.previous.clone()
    }

    /// A deep copy of the value at `path`, or `None` if unresolved.
    pub fn value(&self, path: impl Into<Path>) -> Option<Value> {
        get_at_path(&self.current, &path.into()).cloned()
    }

    /// The value at `path`, or `default` if unresolved.
    pub fn value_or(&self, path: impl Into<Path>, default: Value) -> Value {
        self.value(path).unwrap_or(default)
    }

    /// The change record of the last accepted write (empty after a no-op).
    pub fn changes(&self) -> &ChangeRecord {
        &self.changes
    }

    /// Set the value at one path. Convenience for [`Write::Set`].
    pub fn set_value(&mut self, path: impl Into<Path>, value: impl Into<Value>) -> bool {
        self.apply(Write::set(path, value))
    }

    /// Replace the whole tree. Convenience for [`Write::Replace`].
    pub fn replace_state(&mut self, tree: impl Into<Value>) -> bool {
        self.apply(Write::replace(tree))
    }

    /// Deep-merge a tree over the current one. Convenience for
    /// [`Write::Merge`].
    pub fn merge_state(&mut self, tree: impl Into<Value>) -> bool {
        self.apply(Write::merge(tree))
    }

    /// Apply a write request.
    ///
    /// The accepted pipeline: mutate a fresh clone, diff it against the
    /// current snapshot, stash the previous snapshot, record the diff for
    /// [`ConfigStore::changes`], push it to history, then notify global
    /// listeners followed by path listeners bottom-up. Writes that change
    /// nothing observable update the previous-snapshot bookkeeping but are
    /// neither recorded in history nor announced.
    pub fn apply(&mut self, write: Write) -> bool {
        match write {
            Write::Set { path, value } => {
                // A root path replaces the whole tree, so it gets the same
                // shape guard as an explicit replace.
                if path.is_root() && !self.accept_tree(&value) {
                    return false;
                }
                let mut next = self.current.clone();
                if let Err(err) = set_at_path(&mut next, &path, value) {
                    tracing::warn!(path = %path, error = %err, "rejected path write");
                    return false;
                }
                self.commit(next, ChangeOrigin::Set, true)
            }
            Write::Replace { tree } => {
                if !self.accept_tree(&tree) {
                    return false;
                }
                self.commit(tree, ChangeOrigin::Replace, true)
            }
            Write::Merge { tree } => {
                if !self.accept_tree(&tree) {
                    return false;
                }
                let mut next = self.current.clone();
                deep_merge(&mut next, tree);
                self.commit(next, ChangeOrigin::Merge, true)
            }
        }
    }

    /// Revert the last committed change. Returns `false` with nothing to
    /// undo or if the inverse record fails to apply.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.history.undo().cloned() else {
            return false;
        };

        match apply_changes(&self.current, &record.invert()) {
            Ok(next) => self.commit(next, ChangeOrigin::Undo, false),
            Err(err) => {
                // Put the cursor back where it was.
                self.history.redo();
                tracing::error!(error = %err, "undo failed to apply inverse record");
                false
            }
        }
    }

    /// Re-apply the next change after an undo. Returns `false` with
    /// nothing to redo or if the record fails to apply.
    pub fn redo(&mut self) -> bool {
        let Some(record) = self.history.redo().cloned() else {
            return false;
        };

        match apply_changes(&self.current, &record) {
            Ok(next) => self.commit(next, ChangeOrigin::Redo, false),
            Err(err) => {
                self.history.undo();
                tracing::error!(error = %err, "redo failed to apply record");
                false
            }
        }
    }

    /// True if [`ConfigStore::undo`] has something to revert.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True if [`ConfigStore::redo`] has something to re-apply.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of change records currently retained.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Subscribe to every committed change.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&Value, Option<&ChangeRecord>, ChangeOrigin) + Send + Sync + 'static,
    ) -> SubscriberId {
        self.listeners.subscribe(Arc::new(listener) as GlobalListener)
    }

    /// Subscribe to changes at `path` or any of its descendants.
    pub fn subscribe_path(
        &mut self,
        path: impl Into<Path>,
        listener: impl Fn(&Value, &Path) + Send + Sync + 'static,
    ) -> SubscriberId {
        self.listeners
            .subscribe_path(path.into(), Arc::new(listener) as PathListener)
    }

    /// Remove a subscription. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Shape guard for whole-tree ingestion.
    ///
    /// Sequences and scalars are not trees, and an object shaped like a
    /// validation report is a validation result being fed back in as
    /// state; both are rejected before any bookkeeping happens.
    fn accept_tree(&self, tree: &Value) -> bool {
        if let Err(err) = check_tree_shape(tree) {
            tracing::warn!(error = %err, "rejected whole-state write");
            return false;
        }
        if looks_like_report(tree) {
            tracing::warn!("rejected whole-state write: value is a validation report");
            return false;
        }
        true
    }

    /// Commit `next` as the current snapshot.
    ///
    /// The mutation lands before any listener runs; listener faults are
    /// isolated downstream and cannot unwind it.
    fn commit(&mut self, next: Value, origin: ChangeOrigin, push_history: bool) -> bool {
        let record = diff(&next, &self.current);
        self.previous = std::mem::replace(&mut self.current, next);
        self.changes = record;

        if self.changes.is_empty() {
            tracing::debug!(?origin, "write changed nothing observable");
            return true;
        }

        if push_history {
            self.history.push(self.changes.clone());
        }

        if let Some(validator) = &self.validator {
            let report = validator.validate(&self.current);
            if !report.is_valid {
                for issue in &report.errors {
                    tracing::warn!(path = %issue.path, message = %issue.message, "validation warning");
                }
            }
        }

        self.listeners
            .notify_global(&self.current, Some(&self.changes), origin);
        self.listeners.notify_paths(&self.current, &self.changes);
        true
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("changes", &self.changes.len())
            .field("history", &self.history.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}
