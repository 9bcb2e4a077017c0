//! Linear undo/redo history over snapshots
//!
//! The history stores whole snapshots rather than inverse operations. Before each
//! commit the caller records the state it is about to change; undo hands back the
//! most recent recorded state in exchange for the current one, and redo reverses
//! that exchange. Recording a new state discards everything that could be redone.

use std::collections::VecDeque;

/// Undo and redo stacks of snapshots
#[derive(Debug, Clone)]
pub struct EditHistory<S> {
    /// States that can be restored by undo (most recent at back)
    undo_stack: VecDeque<S>,
    /// States that can be restored by redo (most recent at back)
    redo_stack: VecDeque<S>,
    /// Maximum undo depth (None = unlimited)
    max_depth: Option<usize>,
}

impl<S> EditHistory<S> {
    /// Create an unlimited history
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: None,
        }
    }

    /// Create a history that keeps at most `max_depth` undo entries
    ///
    /// The oldest entries are dropped first. A depth of zero disables undo.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: VecDeque::new(),
            max_depth: Some(max_depth),
        }
    }

    /// Record the state before a commit
    ///
    /// Clears the redo stack: history is linear, a new edit after an undo abandons
    /// the undone branch.
    pub fn record(&mut self, before: S) {
        self.redo_stack.clear();
        self.undo_stack.push_back(before);
        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Step back one edit
    ///
    /// Returns the state to restore, after parking `current` on the redo stack.
    /// Returns `None` (and drops nothing) when there is nothing to undo.
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Some(previous)
    }

    /// Step forward one undone edit
    ///
    /// Symmetric to [`undo`](Self::undo).
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    /// Peek at the state the next undo would restore
    pub fn peek_undo(&self) -> Option<&S> {
        self.undo_stack.back()
    }

    /// Peek at the state the next redo would restore
    pub fn peek_redo(&self) -> Option<&S> {
        self.redo_stack.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Keep only the entries matching `keep`, on both stacks
    pub fn retain<F: FnMut(&S) -> bool>(&mut self, mut keep: F) {
        self.undo_stack.retain(|s| keep(s));
        self.redo_stack.retain(|s| keep(s));
    }
}

impl<S> Default for EditHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut history = EditHistory::new();
        let mut state = 0;

        // Three commits: 0 -> 1 -> 2 -> 3
        for next in 1..=3 {
            history.record(state);
            state = next;
        }
        assert_eq!(history.undo_len(), 3);

        state = history.undo(state).unwrap();
        assert_eq!(state, 2);
        state = history.undo(state).unwrap();
        assert_eq!(state, 1);
        assert_eq!(history.redo_len(), 2);

        state = history.redo(state).unwrap();
        assert_eq!(state, 2);
        state = history.redo(state).unwrap();
        assert_eq!(state, 3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history: EditHistory<i32> = EditHistory::new();
        assert_eq!(history.undo(5), None);
        assert_eq!(history.redo(5), None);
        assert_eq!(history.undo_len() + history.redo_len(), 0);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = EditHistory::new();
        history.record("a");
        history.record("b");
        let restored = history.undo("c").unwrap();
        assert_eq!(restored, "b");
        assert!(history.can_redo());

        history.record("b2");
        assert!(!history.can_redo());
        assert_eq!(history.redo("x"), None);
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = EditHistory::with_max_depth(2);
        history.record(1);
        history.record(2);
        history.record(3);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(4), Some(3));
        assert_eq!(history.undo(3), Some(2));
        assert_eq!(history.undo(2), None);
    }

    #[test]
    fn test_retain() {
        let mut history = EditHistory::new();
        history.record(("s1", 1));
        history.record(("s2", 2));
        history.record(("s1", 3));
        history.undo(("s1", 4));

        history.retain(|(sheet, _)| *sheet != "s1");
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.peek_undo(), Some(&("s2", 2)));
    }
}
