use std::collections::VecDeque;

use crate::constants::HISTORY_LIMIT;

/// Bounded undo/redo stacks of document text snapshots
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    /// Past snapshots, newest at the back
    history: VecDeque<String>,
    /// Redo buffer, next snapshot at the front
    future: VecDeque<String>,
    limit: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl HistoryLedger {
    /// Create a ledger keeping at most `limit` undo snapshots
    pub fn new(limit: usize) -> Self {
        HistoryLedger {
            history: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Record the text as it was before an edit and drop the redo branch
    pub fn record(&mut self, before: &str) {
        self.push_history(before.to_string());
        self.future.clear();
    }

    /// Step back: returns the snapshot to restore, remembering `current` for redo
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let previous = self.history.pop_back()?;
        self.future.push_front(current.to_string());
        Some(previous)
    }

    /// Step forward: returns the snapshot to restore, remembering `current` for undo
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let next = self.future.pop_front()?;
        self.push_history(current.to_string());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.future.clear();
    }

    fn push_history(&mut self, snapshot: String) {
        if self.history.len() == self.limit {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }
}
