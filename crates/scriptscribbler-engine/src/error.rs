use thiserror::Error;

/// Recoverable failures of editing, scene and history operations.
///
/// None of these leave the model in a partially mutated state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),
    #[error("Cannot delete the last scene")]
    CannotDeleteLastScene,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
    #[error("Scene index {index} out of range (scene count {len})")]
    SceneOutOfRange { index: usize, len: usize },
    #[error("Block index {index} out of range (block count {len})")]
    BlockOutOfRange { index: usize, len: usize },
    #[error("Block {index} is not empty")]
    BlockNotEmpty { index: usize },
}

/// Import payload could not be used; the session is untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Malformed import payload: {0}")]
    MalformedImportPayload(#[from] serde_json::Error),
}
