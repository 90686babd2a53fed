use serde::{Deserialize, Serialize};

use crate::models::{BlockType, Project};

/// Fixed screenplay pagination constant.
pub const WORDS_PER_PAGE: usize = 250;

/// One exported line: a non-empty block reduced to format + content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub format: BlockType,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedScene {
    /// 1-based position of the scene in the project.
    pub scene_number: usize,
    pub lines: Vec<ScriptLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub words: usize,
    pub pages: usize,
}

/// Neutral projection of a project handed to the format serializers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedScript {
    pub scenes: Vec<ProjectedScene>,
    /// All scene lines in order, flattened.
    pub lines: Vec<ScriptLine>,
    pub statistics: Statistics,
}

/// Flatten a project into per-scene lines, skipping blank blocks, and total
/// up words and pages.
pub fn project(project: &Project) -> ProjectedScript {
    let scenes: Vec<ProjectedScene> = project
        .scenes()
        .iter()
        .enumerate()
        .map(|(i, scene)| ProjectedScene {
            scene_number: i + 1,
            lines: scene
                .blocks()
                .iter()
                .filter(|b| !b.is_placeholder())
                .map(|b| ScriptLine {
                    format: b.block_type,
                    content: b.text.clone(),
                })
                .collect(),
        })
        .collect();

    let lines: Vec<ScriptLine> = scenes.iter().flat_map(|s| s.lines.clone()).collect();
    let words = lines
        .iter()
        .map(|l| l.content.split_whitespace().count())
        .sum();

    ProjectedScript {
        scenes,
        lines,
        statistics: Statistics {
            words,
            pages: page_count(words),
        },
    }
}

/// Pages for a word count; never less than one.
pub fn page_count(words: usize) -> usize {
    words.div_ceil(WORDS_PER_PAGE).max(1)
}
