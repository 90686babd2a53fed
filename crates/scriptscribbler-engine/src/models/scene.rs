use serde::{Deserialize, Serialize};

use super::block::{Block, BlockType};

/// Ordered blocks of one screenplay scene, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    blocks: Vec<Block>,
}

impl Scene {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// A freshly added scene: a heading placeholder followed by an empty
    /// action block.
    pub fn seeded() -> Self {
        Self::new(vec![
            Block::new(
                BlockType::SceneHeading,
                BlockType::SceneHeading.placeholder(),
            ),
            Block::empty_action(),
        ])
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Text of the first scene heading, or the heading placeholder.
    pub fn heading(&self) -> &str {
        self.blocks
            .iter()
            .find(|b| b.block_type == BlockType::SceneHeading)
            .map(|b| b.text.as_str())
            .unwrap_or(BlockType::SceneHeading.placeholder())
    }

    /// Whitespace-delimited word count over all blocks.
    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.text.split_whitespace().count())
            .sum()
    }

    /// The at-rest form of a scene that is no longer being edited: texts are
    /// trimmed and blank blocks are dropped, except empty action blocks.
    pub fn settled(&self) -> Scene {
        let blocks = self
            .blocks
            .iter()
            .filter_map(|b| {
                let text = b.text.trim();
                (!text.is_empty() || b.block_type == BlockType::Action)
                    .then(|| Block::new(b.block_type, text))
            })
            .collect();
        Scene::new(blocks)
    }

    /// Blocks ready for editing: an empty action block is appended when the
    /// scene is empty or its last block has text.
    pub fn with_entry_point(&self) -> Vec<Block> {
        let mut blocks = self.blocks.clone();
        if blocks.last().is_none_or(|b| !b.text.is_empty()) {
            blocks.push(Block::empty_action());
        }
        blocks
    }
}

impl From<Vec<Block>> for Scene {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

/// The full document: every scene plus the index of the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub(crate) scenes: Vec<Scene>,
    pub(crate) current_scene_index: usize,
}

impl Project {
    /// A new project with a single seeded scene.
    pub fn new() -> Self {
        Self {
            scenes: vec![Scene::seeded()],
            current_scene_index: 0,
        }
    }

    /// Build a project from stored scenes. An empty scene list gets a seeded
    /// scene and an out-of-range index is clamped.
    pub fn from_scenes(mut scenes: Vec<Scene>, current_scene_index: usize) -> Self {
        if scenes.is_empty() {
            log::warn!("project has no scenes, seeding a new one");
            scenes.push(Scene::seeded());
        }
        let last = scenes.len() - 1;
        if current_scene_index > last {
            log::warn!("current scene index {current_scene_index} out of range, clamping to {last}");
        }
        Self {
            current_scene_index: current_scene_index.min(last),
            scenes,
        }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn current_scene_index(&self) -> usize {
        self.current_scene_index
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
