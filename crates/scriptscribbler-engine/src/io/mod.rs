mod saved;

pub use saved::{ImportPayload, SavedProject};

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize project: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to parse project file {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a saved project from a JSON file
pub fn read_project(path: &Path) -> Result<SavedProject, PersistenceError> {
    if !path.exists() {
        return Err(PersistenceError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let saved = SavedProject::from_json(&content).map_err(|source| {
        PersistenceError::Deserialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::info!(
        "loaded project {} ({} scenes)",
        path.display(),
        saved.scenes.len()
    );
    Ok(saved)
}

/// Write a saved project as JSON, creating parent directories as needed
pub fn write_project(path: &Path, saved: &SavedProject) -> Result<(), PersistenceError> {
    let content = saved.to_json().map_err(PersistenceError::Serialize)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content)?;
    log::debug!("wrote project {}", path.display());
    Ok(())
}
