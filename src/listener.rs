//! Listener registry: global and path-scoped change subscribers.
//!
//! Listeners run synchronously, in registration order, after a mutation
//! has already committed. A panicking listener is caught and logged so it
//! can neither roll the mutation back nor starve the remaining listeners.

use crate::change::{ChangeOrigin, ChangeRecord};
use crate::tree::get_at_path;
use crate::Path;
use serde_json::Value;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A subscriber over every committed change.
///
/// Receives the new state, the committed change record (`None` only for
/// bookkeeping-only notifications), and the operation that caused it.
pub type GlobalListener = Arc<dyn Fn(&Value, Option<&ChangeRecord>, ChangeOrigin) + Send + Sync>;

/// A subscriber scoped to one path.
///
/// Receives the current value at the registered path (re-read after the
/// commit) and the registered path itself. Fires when that path or any of
/// its descendants changes.
pub type PathListener = Arc<dyn Fn(&Value, &Path) + Send + Sync>;

/// Opaque handle for removing a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Registry of global and path-scoped listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    global: Vec<(SubscriberId, GlobalListener)>,
    by_path: Vec<(SubscriberId, Path, PathListener)>,
    next_id: u64,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriberId {
        self.next_id += 1;
        SubscriberId(self.next_id)
    }

    /// Register a global listener.
    pub fn subscribe(&mut self, listener: GlobalListener) -> SubscriberId {
        let id = self.next_id();
        self.global.push((id, listener));
        id
    }

    /// Register a listener scoped to `path`.
    pub fn subscribe_path(&mut self, path: Path, listener: PathListener) -> SubscriberId {
        let id = self.next_id();
        self.by_path.push((id, path, listener));
        id
    }

    /// Remove a subscription. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.global.len() + self.by_path.len();
        self.global.retain(|(gid, _)| *gid != id);
        self.by_path.retain(|(pid, _, _)| *pid != id);
        before != self.global.len() + self.by_path.len()
    }

    /// Number of registered listeners (global + path).
    pub fn len(&self) -> usize {
        self.global.len() + self.by_path.len()
    }

    /// True if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_path.is_empty()
    }

    /// Notify every global listener of a committed change.
    pub fn notify_global(&self, state: &Value, changes: Option<&ChangeRecord>, origin: ChangeOrigin) {
        for (id, listener) in &self.global {
            let result = catch_unwind(AssertUnwindSafe(|| listener(state, changes, origin)));
            if result.is_err() {
                tracing::error!(subscriber = id.0, "global listener panicked; continuing");
            }
        }
    }

    /// Notify path listeners affected by a committed record.
    ///
    /// Walks bottom-up: the most specific changed paths first, then each
    /// of their ancestors up to and including the root, re-reading the
    /// current value at every stop. Each registered path is visited at
    /// most once per commit. A root-sentinel entry touches everything, so
    /// it notifies every path listener.
    pub fn notify_paths(&self, state: &Value, record: &ChangeRecord) {
        if record.root_entry().is_some() {
            for (id, path, listener) in &self.by_path {
                self.fire_path(id, path, listener, state);
            }
            return;
        }

        let mut changed: Vec<&Path> = record.paths().collect();
        changed.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut visited: HashSet<Path> = HashSet::new();
        for changed_path in changed {
            let stops = changed_path
                .self_and_ancestors()
                .chain(std::iter::once(Path::root()));
            for stop in stops {
                if !visited.insert(stop.clone()) {
                    continue;
                }
                for (id, path, listener) in &self.by_path {
                    if *path == stop {
                        self.fire_path(id, path, listener, state);
                    }
                }
            }
        }
    }

    fn fire_path(&self, id: &SubscriberId, path: &Path, listener: &PathListener, state: &Value) {
        let value = get_at_path(state, path).cloned().unwrap_or(Value::Null);
        let result = catch_unwind(AssertUnwindSafe(|| listener(&value, path)));
        if result.is_err() {
            tracing::error!(
                subscriber = id.0,
                path = %path,
                "path listener panicked; continuing"
            );
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("global", &self.global.len())
            .field("by_path", &self.by_path.len())
            .finish()
    }
}
