use crate::classify::ClassificationMode;
use crate::editing::SceneEditor;
use crate::error::EditError;
use crate::models::{Block, Project, Scene};

/// Owns every scene of a project and the live editor of the active one.
///
/// Scenes other than the active one are at rest in `scenes`. The active
/// scene's slot is stale while it is being edited: the editor holds the live
/// copy, and it is written back (settled) whenever another scene is loaded
/// or the scene list is rearranged.
#[derive(Debug, Clone)]
pub struct SceneContainer {
    scenes: Vec<Scene>,
    current: usize,
    editor: SceneEditor,
}

impl SceneContainer {
    pub fn new(project: Project, mode: ClassificationMode) -> Self {
        let Project {
            scenes,
            current_scene_index,
        } = project;
        let editor = SceneEditor::load(&scenes[current_scene_index], mode);
        Self {
            scenes,
            current: current_scene_index,
            editor,
        }
    }

    pub fn current_scene_index(&self) -> usize {
        self.current
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn editor(&self) -> &SceneEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut SceneEditor {
        &mut self.editor
    }

    /// Blocks of the active scene as currently edited.
    pub fn active_blocks(&self) -> &[Block] {
        self.editor.blocks()
    }

    /// The whole project with the active scene's live blocks in place.
    pub fn project(&self) -> Project {
        let mut scenes = self.scenes.clone();
        scenes[self.current] = self.editor.to_scene();
        Project {
            scenes,
            current_scene_index: self.current,
        }
    }

    /// Replace all state with a previously captured project, verbatim.
    pub fn restore(&mut self, project: Project) {
        let mode = self.editor.mode();
        let Project {
            scenes,
            current_scene_index,
        } = project;
        self.editor = SceneEditor::new(scenes[current_scene_index].blocks().to_vec(), mode);
        self.scenes = scenes;
        self.current = current_scene_index;
        self.check_invariants();
    }

    /// Make `index` the active scene, writing back the one being left.
    pub fn load_scene(&mut self, index: usize) -> Result<&[Block], EditError> {
        self.check_scene(index)?;
        if index != self.current {
            self.commit_active();
            self.current = index;
            self.reload_active();
        }
        log::debug!("scene {index} active");
        Ok(self.editor.blocks())
    }

    /// Append a seeded scene and make it active. Returns its index.
    pub fn add_scene(&mut self) -> usize {
        self.commit_active();
        self.scenes.push(Scene::seeded());
        self.current = self.scenes.len() - 1;
        self.reload_active();
        log::debug!("added scene {}", self.current);
        self.current
    }

    pub fn delete_scene(&mut self, index: usize) -> Result<(), EditError> {
        if self.scenes.len() <= 1 {
            return Err(EditError::CannotDeleteLastScene);
        }
        self.check_scene(index)?;

        self.commit_active();
        self.scenes.remove(index);

        if index < self.current {
            self.current -= 1;
        } else if index == self.current && self.current >= self.scenes.len() {
            // The deleted scene was the last one; fall back to the new last.
            self.current = self.scenes.len() - 1;
        }
        self.reload_active();
        log::debug!("deleted scene {index}, active scene now {}", self.current);
        Ok(())
    }

    /// Move a scene to a new position (remove, then insert). The active
    /// scene stays active wherever it ends up.
    pub fn reorder_scene(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        self.check_scene(from)?;
        self.check_scene(to)?;
        if from == to {
            return Ok(());
        }

        self.commit_active();
        let scene = self.scenes.remove(from);
        self.scenes.insert(to, scene);

        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        self.reload_active();
        log::debug!("moved scene {from} to {to}");
        Ok(())
    }

    /// Exchange two scenes in place. The active scene stays active.
    pub fn swap_scenes(&mut self, a: usize, b: usize) -> Result<(), EditError> {
        self.check_scene(a)?;
        self.check_scene(b)?;
        if a == b {
            return Ok(());
        }

        self.commit_active();
        self.scenes.swap(a, b);
        if self.current == a {
            self.current = b;
        } else if self.current == b {
            self.current = a;
        }
        self.reload_active();
        log::debug!("swapped scenes {a} and {b}");
        Ok(())
    }

    fn check_scene(&self, index: usize) -> Result<(), EditError> {
        if index < self.scenes.len() {
            Ok(())
        } else {
            Err(EditError::SceneOutOfRange {
                index,
                len: self.scenes.len(),
            })
        }
    }

    fn commit_active(&mut self) {
        self.check_invariants();
        self.scenes[self.current] = self.editor.to_scene().settled();
    }

    fn reload_active(&mut self) {
        self.check_invariants();
        self.editor = SceneEditor::load(&self.scenes[self.current], self.editor.mode());
    }

    fn check_invariants(&mut self) {
        debug_assert!(
            self.current < self.scenes.len(),
            "current scene {} out of range",
            self.current
        );
        if self.current >= self.scenes.len() {
            log::warn!("current scene {} out of range, clamping", self.current);
            self.current = self.scenes.len().saturating_sub(1);
        }
    }
}
