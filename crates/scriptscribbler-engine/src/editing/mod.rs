/*!
 * # Block Editing Core
 *
 * A scene is edited as a flat sequence of typed blocks. This module holds
 * the rules for how that sequence changes in response to user input.
 *
 * ## Architecture Overview
 *
 * ### 1. Command-Based Editing
 * - Every edit is a **`Cmd`** addressed to a block index
 * - Key presses are translated to commands by **`KeyEvent::to_command`**
 * - Applying a command yields a **`Patch`**: the changed block range and the
 *   new logical focus (block index + caret offset in characters)
 *
 * ### 2. Classification On Every Edit
 * - Text edits run the editor's **`ClassificationMode`**: auto-detect infers
 *   the type from the text, enforced-type normalizes the text for the type
 * - Explicit retypes (Tab cycle, format selector) always normalize
 *
 * ### 3. No Presentation Concerns
 * - Carets are plain integers; a front end maps them to its own selection
 *   objects and re-renders from `SceneEditor::blocks()` after each patch
 *
 * ## Usage Pattern
 *
 * ```rust
 * use scriptscribbler_engine::classify::ClassificationMode;
 * use scriptscribbler_engine::editing::{Cmd, SceneEditor};
 * use scriptscribbler_engine::models::{Block, BlockType};
 *
 * let mut editor = SceneEditor::new(
 *     vec![Block::new(BlockType::Character, "SARAH")],
 *     ClassificationMode::EnforcedType,
 * );
 *
 * // Enter at the end of a character cue starts a dialogue block
 * let patch = editor.apply(Cmd::SplitAt { index: 0, caret: 5 }).unwrap();
 * assert_eq!(patch.focus.index, 1);
 * assert_eq!(editor.blocks()[1].block_type, BlockType::Dialogue);
 * ```
 */

pub mod commands;
pub mod editor;
pub mod patch;

pub use commands::{Cmd, Key, KeyEvent};
pub use editor::SceneEditor;
pub use patch::{Focus, Patch};
