//! Block type classification.
//!
//! Two modes exist because front ends disagree on who owns a block's type:
//! either the text decides ([`ClassificationMode::AutoDetect`]) or the user
//! picks the type and the text is normalized to fit it
//! ([`ClassificationMode::EnforcedType`]).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::BlockType;

/// Longest text (in characters) still considered a character cue.
pub const MAX_CHARACTER_CUE_LEN: usize = 30;

static SCENE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(INT\.|EXT\.|EST\.|INT/EXT\.)").expect("valid regex"));

static CHARACTER_CUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9\s\-.']+$").expect("valid regex"));

/// How text edits interact with a block's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMode {
    /// The type is inferred from the text on every edit.
    AutoDetect,
    /// The type is chosen by the user; edits are normalized to it.
    #[default]
    EnforcedType,
}

/// Infer a block type from its text.
///
/// Rules are tried in order and the first match wins. Returns `None` for
/// blank text, meaning the current type should be kept.
pub fn detect_type(text: &str) -> Option<BlockType> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if SCENE_HEADING.is_match(trimmed) {
        return Some(BlockType::SceneHeading);
    }
    if trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
        return Some(BlockType::Parenthetical);
    }
    if is_character_cue(trimmed) {
        return Some(BlockType::Character);
    }
    Some(BlockType::Action)
}

fn is_character_cue(trimmed: &str) -> bool {
    trimmed.chars().count() <= MAX_CHARACTER_CUE_LEN
        && trimmed.to_uppercase() == trimmed
        && CHARACTER_CUE.is_match(trimmed)
}

/// Normalize text for an explicitly chosen block type.
///
/// Idempotent: conforming text comes back unchanged.
pub fn enforce(block_type: BlockType, text: &str) -> String {
    match block_type {
        BlockType::Character | BlockType::SceneHeading => text.to_uppercase(),
        BlockType::Parenthetical => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('(') {
                text.to_string()
            } else {
                format!("({trimmed}")
            }
        }
        BlockType::Action | BlockType::Dialogue => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("INT. HOUSE - DAY", Some(BlockType::SceneHeading))]
    #[case("ext. beach - night", Some(BlockType::SceneHeading))]
    #[case("EST. CITY SKYLINE", Some(BlockType::SceneHeading))]
    #[case("INT/EXT. CAR - MOVING", Some(BlockType::SceneHeading))]
    #[case("(whispering)", Some(BlockType::Parenthetical))]
    #[case("  (beat)  ", Some(BlockType::Parenthetical))]
    #[case("SARAH", Some(BlockType::Character))]
    #[case("DR. O'NEIL-SMITH", Some(BlockType::Character))]
    #[case("She walks away.", Some(BlockType::Action))]
    #[case("THIS LINE IS WAY TOO LONG TO BE A CHARACTER CUE", Some(BlockType::Action))]
    #[case("SARAH (V.O.)", Some(BlockType::Action))]
    #[case("INTERIOR", Some(BlockType::Character))]
    #[case("", None)]
    #[case("   ", None)]
    fn test_detect_type(#[case] text: &str, #[case] expected: Option<BlockType>) {
        assert_eq!(detect_type(text), expected);
    }

    #[test]
    fn test_scene_heading_wins_over_character() {
        // All caps and short, but the heading rule is checked first.
        assert_eq!(detect_type("INT. BAR"), Some(BlockType::SceneHeading));
    }

    #[rstest]
    #[case(BlockType::Character, "sarah", "SARAH")]
    #[case(BlockType::SceneHeading, "int. house - day", "INT. HOUSE - DAY")]
    #[case(BlockType::Parenthetical, "  whispering", "(whispering")]
    #[case(BlockType::Parenthetical, "(whispering)", "(whispering)")]
    #[case(BlockType::Parenthetical, "", "")]
    #[case(BlockType::Action, "she runs", "she runs")]
    #[case(BlockType::Dialogue, "hi there", "hi there")]
    fn test_enforce(#[case] block_type: BlockType, #[case] text: &str, #[case] expected: &str) {
        assert_eq!(enforce(block_type, text), expected);
    }

    #[test]
    fn test_enforce_is_idempotent() {
        for block_type in BlockType::ALL {
            for text in ["walk", "(aside", "  mumbling ", "INT. ROOM", ""] {
                let once = enforce(block_type, text);
                assert_eq!(enforce(block_type, &once), once, "{block_type} / {text:?}");
            }
        }
    }
}
