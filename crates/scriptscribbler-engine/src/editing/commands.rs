use crate::error::EditError;
use crate::models::{Block, BlockType};

/// Edit commands understood by [`SceneEditor`](super::SceneEditor).
///
/// Every command addresses a block by its index in the active scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Replace a block's text, then classify it per the active mode.
    EditText { index: usize, text: String },
    /// Advance to the next type in the Tab cycle.
    CycleType { index: usize },
    /// Split a block at a caret offset (in characters).
    SplitAt { index: usize, caret: usize },
    /// Remove a blank block and focus the one before it.
    DeleteEmptyAndMergeBack { index: usize },
    /// Explicitly retype a block.
    ChangeType { index: usize, block_type: BlockType },
    /// Move a block to a new position, shifting the blocks in between.
    MoveBlock { from: usize, to: usize },
    FocusPrevious { index: usize },
    FocusNext { index: usize },
}

impl Cmd {
    /// Build a `ChangeType` from a type name as sent by a format selector.
    pub fn change_type(index: usize, type_name: &str) -> Result<Self, EditError> {
        Ok(Cmd::ChangeType {
            index,
            block_type: type_name.parse()?,
        })
    }

    /// Whether the command touches block content at all.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Cmd::FocusPrevious { .. } | Cmd::FocusNext { .. })
    }

    /// Structural commands each count as one undoable user action; text
    /// edits are grouped by the session instead.
    pub fn is_structural(&self) -> bool {
        self.is_mutation() && !matches!(self, Cmd::EditText { .. })
    }
}

/// Keys the editor reacts to. Anything else is left to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
}

/// A keydown in a block, with the caret offset at the time of the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub index: usize,
    pub caret: usize,
}

impl KeyEvent {
    pub fn new(key: Key, index: usize, caret: usize) -> Self {
        Self { key, index, caret }
    }

    /// Map the key press to a command, or `None` when the editor should not
    /// intercept it (Backspace in a block that still has text).
    pub fn to_command(&self, blocks: &[Block]) -> Option<Cmd> {
        let index = self.index;
        match self.key {
            Key::Tab => Some(Cmd::CycleType { index }),
            Key::Enter => Some(Cmd::SplitAt {
                index,
                caret: self.caret,
            }),
            Key::Backspace => blocks
                .get(index)
                .filter(|b| b.is_placeholder())
                .map(|_| Cmd::DeleteEmptyAndMergeBack { index }),
            Key::ArrowUp => Some(Cmd::FocusPrevious { index }),
            Key::ArrowDown => Some(Cmd::FocusNext { index }),
        }
    }
}
