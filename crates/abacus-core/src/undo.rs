use std::collections::VecDeque;

use crate::operator::Operator;

/// Pre-mutation copy of the undoable calculator fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub display: String,
    pub previous_value: String,
    pub operation: Option<Operator>,
    pub memory: f64,
    /// Restored with the display so an undone `=` resumes editing the
    /// operand instead of starting a fresh one.
    pub waiting_for_value: bool,
    /// Unix milliseconds.
    pub timestamp: u64,
}

/// Linear undo/redo over two bounded stacks.
///
/// Recording a new snapshot discards the redo side entirely. When a stack
/// reaches its depth the oldest snapshot falls off the bottom.
#[derive(Clone, Debug)]
pub struct UndoHistory {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    depth: usize,
}

impl UndoHistory {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    /// Push the state captured before a mutating input.
    pub fn record(&mut self, snapshot: Snapshot) {
        push_bounded(&mut self.undo, snapshot, self.depth);
        self.redo.clear();
    }

    /// Pop the latest undo snapshot, stashing `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        push_bounded(&mut self.redo, current, self.depth);
        Some(previous)
    }

    /// Pop the latest redo snapshot, stashing `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop_back()?;
        push_bounded(&mut self.undo, current, self.depth);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, depth: usize) {
    if stack.len() == depth {
        stack.pop_front();
    }
    stack.push_back(snapshot);
}
