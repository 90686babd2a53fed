use crate::classify::{self, ClassificationMode};
use crate::editing::{Cmd, Focus, KeyEvent, Patch};
use crate::error::EditError;
use crate::models::{Block, BlockType, Scene};

/// Live block sequence of the scene currently being edited.
///
/// `SceneEditor` owns the blocks, the logical focus and the classification
/// mode. Every mutation goes through [`SceneEditor::apply`], which returns a
/// [`Patch`] describing what changed and where focus landed. The sequence is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEditor {
    blocks: Vec<Block>,
    focus: Focus,
    /// Block whose type was set explicitly while it held focus; auto-detect
    /// leaves it alone until focus moves elsewhere.
    pinned: Option<usize>,
    mode: ClassificationMode,
    version: u64,
}

impl SceneEditor {
    /// Create an editor over raw blocks. An empty list gets one empty action
    /// block so there is always somewhere to type.
    pub fn new(mut blocks: Vec<Block>, mode: ClassificationMode) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::empty_action());
        }
        Self {
            blocks,
            focus: Focus::default(),
            pinned: None,
            mode,
            version: 0,
        }
    }

    /// Open a stored scene for editing, adding a trailing entry point.
    pub fn load(scene: &Scene, mode: ClassificationMode) -> Self {
        Self::new(scene.with_entry_point(), mode)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn mode(&self) -> ClassificationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ClassificationMode) {
        self.mode = mode;
    }

    /// The live blocks as a scene, exactly as they are.
    pub fn to_scene(&self) -> Scene {
        Scene::new(self.blocks.clone())
    }

    /// Translate a key press and apply it. `Ok(None)` means the key was not
    /// intercepted and the front end should handle it itself.
    pub fn handle_key(&mut self, event: KeyEvent) -> Result<Option<Patch>, EditError> {
        match event.to_command(&self.blocks) {
            Some(cmd) => self.apply(cmd).map(Some),
            None => Ok(None),
        }
    }

    /// Apply command to the block sequence.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        log::debug!("applying {cmd:?}");
        let changed = match cmd {
            Cmd::EditText { index, text } => self.edit_text(index, text)?,
            Cmd::CycleType { index } => {
                let next = self.block(index)?.block_type.cycled();
                self.retype(index, next)?
            }
            Cmd::ChangeType { index, block_type } => self.retype(index, block_type)?,
            Cmd::SplitAt { index, caret } => self.split_at(index, caret)?,
            Cmd::DeleteEmptyAndMergeBack { index } => self.delete_empty_and_merge_back(index)?,
            Cmd::MoveBlock { from, to } => self.move_block(from, to)?,
            Cmd::FocusPrevious { index } => {
                self.block(index)?;
                if index > 0 {
                    self.focus_end(index - 1);
                }
                index..index
            }
            Cmd::FocusNext { index } => {
                self.block(index)?;
                if index + 1 < self.blocks.len() {
                    self.focus_end(index + 1);
                }
                index..index
            }
        };

        self.version += 1;
        Ok(Patch {
            changed,
            focus: self.focus,
            version: self.version,
        })
    }

    fn block(&self, index: usize) -> Result<&Block, EditError> {
        self.blocks.get(index).ok_or(EditError::BlockOutOfRange {
            index,
            len: self.blocks.len(),
        })
    }

    fn block_mut(&mut self, index: usize) -> Result<&mut Block, EditError> {
        let len = self.blocks.len();
        self.blocks
            .get_mut(index)
            .ok_or(EditError::BlockOutOfRange { index, len })
    }

    /// Move focus to the end of a block. Leaving a pinned block unpins it.
    fn focus_end(&mut self, index: usize) {
        if self.pinned != Some(index) {
            self.pinned = None;
        }
        let caret = self.blocks.get(index).map_or(0, Block::char_len);
        self.focus = Focus::new(index, caret);
    }

    fn edit_text(
        &mut self,
        index: usize,
        text: String,
    ) -> Result<std::ops::Range<usize>, EditError> {
        let mode = self.mode;
        let pinned = self.pinned == Some(index);
        let block = self.block_mut(index)?;
        match mode {
            ClassificationMode::AutoDetect => {
                if !pinned && let Some(detected) = classify::detect_type(&text) {
                    block.block_type = detected;
                }
                block.text = text;
            }
            ClassificationMode::EnforcedType => {
                block.text = classify::enforce(block.block_type, &text);
            }
        }
        self.focus_end(index);
        Ok(index..index + 1)
    }

    fn retype(
        &mut self,
        index: usize,
        block_type: BlockType,
    ) -> Result<std::ops::Range<usize>, EditError> {
        let block = self.block_mut(index)?;
        block.block_type = block_type;
        block.text = classify::enforce(block_type, &block.text);
        self.focus_end(index);
        self.pinned = Some(index);
        Ok(index..index + 1)
    }

    fn split_at(&mut self, index: usize, caret: usize) -> Result<std::ops::Range<usize>, EditError> {
        let block = self.block_mut(index)?;
        let at = byte_offset(&block.text, caret);
        let after = block.text.split_off(at);

        // Text after the caret continues the same kind of line; an empty
        // remainder starts the conventional next element.
        let new_type = if after.trim().is_empty() {
            block.block_type.next_default()
        } else {
            block.block_type
        };

        self.blocks.insert(index + 1, Block::new(new_type, after));
        self.focus_end(index + 1);
        Ok(index..index + 2)
    }

    fn delete_empty_and_merge_back(
        &mut self,
        index: usize,
    ) -> Result<std::ops::Range<usize>, EditError> {
        if !self.block(index)?.is_placeholder() {
            return Err(EditError::BlockNotEmpty { index });
        }
        if self.blocks.len() == 1 {
            return Ok(index..index);
        }

        self.blocks.remove(index);
        let target = index.saturating_sub(1);
        self.focus_end(target);
        if index == 0 {
            self.focus.caret = 0;
        }
        Ok(target..target)
    }

    fn move_block(&mut self, from: usize, to: usize) -> Result<std::ops::Range<usize>, EditError> {
        self.block(from)?;
        self.block(to)?;
        if from == to {
            return Ok(from..from);
        }

        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.pinned = self.pinned.map(|p| moved_index(p, from, to));
        self.focus_end(to);
        Ok(from.min(to)..from.max(to) + 1)
    }
}

/// Where the block at `index` ends up after moving `from` to `to`.
fn moved_index(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < index && index <= to {
        index - 1
    } else if to <= index && index < from {
        index + 1
    } else {
        index
    }
}

/// Byte index of a character offset, clamped to the end of the text.
fn byte_offset(text: &str, caret: usize) -> usize {
    text.char_indices()
        .nth(caret)
        .map_or(text.len(), |(byte, _)| byte)
}
