pub mod autosave;
pub mod classify;
pub mod container;
pub mod editing;
pub mod error;
pub mod export;
pub mod history;
pub mod io;
pub mod models;
pub mod search;
pub mod session;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use classify::ClassificationMode;
pub use editing::{Cmd, Focus, Key, KeyEvent, Patch, SceneEditor};
pub use error::{EditError, ImportError};
pub use io::{ImportPayload, PersistenceError, SavedProject};
pub use models::{Block, BlockType, Project, Scene};
pub use session::{EditorSession, SessionOptions};
