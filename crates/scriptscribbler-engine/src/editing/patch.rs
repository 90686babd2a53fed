use std::ops::Range;

/// Logical caret position: a block index and a character offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Focus {
    pub index: usize,
    pub caret: usize,
}

impl Focus {
    pub fn new(index: usize, caret: usize) -> Self {
        Self { index, caret }
    }
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Block indices (in the new sequence) whose type or text changed.
    /// Empty for pure focus moves and removals.
    pub changed: Range<usize>,
    pub focus: Focus,
    pub version: u64,
}

impl Patch {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}
