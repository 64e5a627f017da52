//! Bounded, cursor-addressed change history for undo/redo.
//!
//! The history owns committed [`ChangeRecord`]s in order. The cursor
//! addresses the most recently applied record; `None` means every record
//! has been undone (or none was ever pushed). Because records are
//! self-invertible, undo hands the caller the record to invert and redo
//! hands back the record to re-apply — no baseline replay is needed.

use crate::change::ChangeRecord;

/// Default bound on the number of retained change records.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A bounded stack of change records with an undo/redo cursor.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<ChangeRecord>,
    cursor: Option<usize>,
    limit: usize,
}

impl History {
    /// Create a history bounded at `limit` records.
    ///
    /// A limit of zero is clamped to one; a history that cannot hold a
    /// single record could never undo anything.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Push a freshly committed record.
    ///
    /// Anything after the cursor is discarded first — a new change prunes
    /// the redo branch. The bound is then enforced by dropping records
    /// from the front and shifting the cursor down equally.
    pub fn push(&mut self, record: ChangeRecord) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(record);
        self.cursor = Some(self.entries.len() - 1);

        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(..overflow);
            // Cursor sits at the end after a push, so it never underflows.
            self.cursor = Some(self.entries.len() - 1);
        }
    }

    /// True if there is a record to undo.
    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    /// True if there is a record to redo.
    #[inline]
    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(c) => c + 1 < self.entries.len(),
            None => !self.entries.is_empty(),
        }
    }

    /// Step the cursor backwards and return the record that was applied at
    /// that position. The caller inverts it to move the state back.
    pub fn undo(&mut self) -> Option<&ChangeRecord> {
        let c = self.cursor?;
        self.cursor = c.checked_sub(1);
        Some(&self.entries[c])
    }

    /// Step the cursor forwards and return the record to re-apply.
    pub fn redo(&mut self) -> Option<&ChangeRecord> {
        let next = match self.cursor {
            Some(c) => c + 1,
            None => 0,
        };
        if next < self.entries.len() {
            self.cursor = Some(next);
            Some(&self.entries[next])
        } else {
            None
        }
    }

    /// Number of retained records.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no records are retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cursor position (`None` = nothing applied).
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The configured bound.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop all records and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeEntry;
    use crate::path;
    use serde_json::json;

    fn record(n: i64) -> ChangeRecord {
        ChangeRecord::new().with_entry(path!("n"), ChangeEntry::changed(json!(n), json!(n - 1)))
    }

    #[test]
    fn test_push_advances_cursor() {
        let mut history = History::new(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());

        history.push(record(1));
        history.push(record(2));
        assert_eq!(history.cursor(), Some(1));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(10);
        history.push(record(1));
        history.push(record(2));

        assert_eq!(history.undo(), Some(&record(2)));
        assert_eq!(history.cursor(), Some(0));
        assert!(history.can_redo());

        assert_eq!(history.undo(), Some(&record(1)));
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());

        assert_eq!(history.undo(), None);

        assert_eq!(history.redo(), Some(&record(1)));
        assert_eq!(history.redo(), Some(&record(2)));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_prunes_redo_branch() {
        let mut history = History::new(10);
        history.push(record(1));
        history.push(record(2));
        history.push(record(3));

        history.undo();
        history.undo();
        assert_eq!(history.len(), 3);

        history.push(record(9));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(&record(9)));
        assert_eq!(history.undo(), Some(&record(1)));
    }

    #[test]
    fn test_bound_drops_oldest() {
        let mut history = History::new(3);
        for n in 1..=8 {
            history.push(record(n));
        }
        assert_eq!(history.len(), 3);

        // Only the newest three are reachable via undo.
        assert_eq!(history.undo(), Some(&record(8)));
        assert_eq!(history.undo(), Some(&record(7)));
        assert_eq!(history.undo(), Some(&record(6)));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let history = History::new(0);
        assert_eq!(history.limit(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(10);
        history.push(record(1));
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
