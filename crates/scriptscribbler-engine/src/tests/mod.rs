use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::models::{Block, BlockType, Project, Scene};

/// Create a temporary directory for project files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Two short scenes with a speaking character each
pub fn sample_project() -> Project {
    Project::from_scenes(
        vec![
            Scene::new(vec![
                Block::new(BlockType::SceneHeading, "INT. DINER - NIGHT"),
                Block::new(BlockType::Action, "Rain hammers the windows."),
                Block::new(BlockType::Character, "MAYA"),
                Block::new(BlockType::Dialogue, "You're late."),
            ]),
            Scene::new(vec![
                Block::new(BlockType::SceneHeading, "EXT. PARKING LOT - NIGHT"),
                Block::new(BlockType::Character, "JONAH"),
                Block::new(BlockType::Parenthetical, "(breathless)"),
                Block::new(BlockType::Dialogue, "Traffic was a nightmare."),
            ]),
        ],
        0,
    )
}
