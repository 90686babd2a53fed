use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EditError;

/// Formatting type of a screenplay block.
///
/// The declaration order is the Tab-cycle order used by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Action,
    SceneHeading,
    Character,
    Dialogue,
    Parenthetical,
}

impl BlockType {
    /// Every block type, in cycle order.
    pub const ALL: [BlockType; 5] = [
        BlockType::Action,
        BlockType::SceneHeading,
        BlockType::Character,
        BlockType::Dialogue,
        BlockType::Parenthetical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Action => "action",
            BlockType::SceneHeading => "scene-heading",
            BlockType::Character => "character",
            BlockType::Dialogue => "dialogue",
            BlockType::Parenthetical => "parenthetical",
        }
    }

    /// Next type in the Tab cycle, wrapping around.
    pub fn cycled(self) -> BlockType {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Type given to a fresh block created by pressing Enter at the end of a
    /// block of this type.
    pub fn next_default(self) -> BlockType {
        match self {
            BlockType::SceneHeading => BlockType::Action,
            BlockType::Action => BlockType::Character,
            BlockType::Character => BlockType::Dialogue,
            BlockType::Dialogue => BlockType::Action,
            BlockType::Parenthetical => BlockType::Dialogue,
        }
    }

    /// Hint text a front end shows in an empty block.
    pub fn placeholder(self) -> &'static str {
        match self {
            BlockType::SceneHeading => "INT./EXT. LOCATION - TIME",
            BlockType::Action => "Describe the action...",
            BlockType::Character => "CHARACTER NAME",
            BlockType::Dialogue => "Character dialogue...",
            BlockType::Parenthetical => "(direction)",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EditError::InvalidBlockType(s.to_string()))
    }
}

impl Serialize for BlockType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown type names are coerced to `action` rather than rejected, so that
/// a saved project with a stray type still loads.
impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|_| {
            log::warn!("unknown block type {raw:?}, coercing to action");
            BlockType::Action
        }))
    }
}

/// One unit of screenplay text with its formatting type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default, deserialize_with = "nullable_text")]
    pub text: String,
}

impl Block {
    pub fn new(block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            block_type,
            text: text.into(),
        }
    }

    /// An empty action block, the trailing entry point of a scene.
    pub fn empty_action() -> Self {
        Self::new(BlockType::Action, "")
    }

    /// A block is a placeholder when it holds nothing but whitespace.
    pub fn is_placeholder(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length of the text in characters, the unit carets are measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
