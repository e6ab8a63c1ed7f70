use std::collections::VecDeque;

/// Undo/redo stacks of whole-state snapshots.
///
/// Callers record the state *before* each committed mutation. `undo` and
/// `redo` exchange the caller's current state for the stored one, so both
/// directions stay symmetric.
#[derive(Debug, Clone)]
pub struct HistoryManager<T: Clone> {
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
    limit: usize,
}

impl<T: Clone> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::with_limit(100)
    }
}

impl<T: Clone> HistoryManager<T> {
    /// `limit` bounds the undo depth; the oldest entries are dropped first.
    /// A limit of `0` is treated as `1`.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Records one undoable step and invalidates the redo branch.
    pub fn record(&mut self, before: T) {
        self.redo_stack.clear();
        self.undo_stack.push_back(before);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns the state to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Returns the state to restore, or `None` when there is nothing to redo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
