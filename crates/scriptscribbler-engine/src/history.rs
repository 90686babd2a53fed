use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::error::EditError;
use crate::models::Project;

/// Number of undo steps kept unless configured otherwise.
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Immutable copy of the full editing state at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    project: Project,
    taken_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn capture(project: Project) -> Self {
        Self {
            project,
            taken_at: Utc::now(),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

/// Linear undo/redo stacks. A new action discards the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Push the state from just before a user action.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo.clear();
    }

    /// Step back. `current` is the live state, kept for redo.
    pub fn undo(&mut self, current: Snapshot) -> Result<Snapshot, EditError> {
        let previous = self.undo.pop_back().ok_or(EditError::NothingToUndo)?;
        self.redo.push(current);
        Ok(previous)
    }

    /// Step forward again. `current` is the live state, kept for undo.
    pub fn redo(&mut self, current: Snapshot) -> Result<Snapshot, EditError> {
        let next = self.redo.pop().ok_or(EditError::NothingToRedo)?;
        self.push_undo(current);
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}
