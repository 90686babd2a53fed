use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ImportError;
use crate::models::{Project, Scene};

/// Serializable state handed to a persistence collaborator.
///
/// Notes are opaque and passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    #[serde(alias = "sceneScripts")]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub notes: Vec<Value>,
    #[serde(default)]
    pub current_scene_index: usize,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl SavedProject {
    pub fn new(project: &Project, notes: &[Value], saved_at: DateTime<Utc>) -> Self {
        Self {
            scenes: project.scenes().to_vec(),
            notes: notes.to_vec(),
            current_scene_index: project.current_scene_index(),
            saved_at,
        }
    }

    /// The project held by this state. Empty scene lists are seeded and the
    /// index is clamped.
    pub fn to_project(&self) -> Project {
        Project::from_scenes(self.scenes.clone(), self.current_scene_index)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A user-supplied import document. Present keys replace the matching
/// project state wholesale; absent keys leave it alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportPayload {
    #[serde(default, alias = "sceneScripts")]
    pub scenes: Option<Vec<Scene>>,
    #[serde(default)]
    pub notes: Option<Vec<Value>>,
}

impl ImportPayload {
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_none() && self.notes.is_none()
    }
}
