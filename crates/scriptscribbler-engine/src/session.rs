use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;

use crate::autosave::AutoSave;
use crate::classify::ClassificationMode;
use crate::container::SceneContainer;
use crate::editing::{Cmd, Focus, KeyEvent, Patch};
use crate::error::{EditError, ImportError};
use crate::export::{self, ExportError, ExportPackage, ExportRequest, ProjectedScript};
use crate::history::{DEFAULT_UNDO_LIMIT, History, Snapshot};
use crate::io::{ImportPayload, SavedProject};
use crate::models::{Block, Project};
use crate::search::{self, SearchFilter, SearchResult};
use crate::stats::{self, ScriptReport};

/// How a session is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub mode: ClassificationMode,
    pub undo_limit: usize,
    /// `None` leaves auto-save disarmed.
    pub auto_save_interval: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: ClassificationMode::default(),
            undo_limit: DEFAULT_UNDO_LIMIT,
            auto_save_interval: None,
        }
    }
}

/// One editing session: the project, its undo history, the notes riding
/// along with it and the auto-save deadline.
///
/// All mutations go through the session so that history is recorded before
/// the change and auto-save is re-armed after it. Errors never leave a
/// history entry behind.
#[derive(Debug, Clone)]
pub struct EditorSession {
    container: SceneContainer,
    history: History,
    notes: Vec<Value>,
    autosave: Option<AutoSave>,
    /// (scene, block) currently receiving grouped text edits.
    typing_in: Option<(usize, usize)>,
}

impl EditorSession {
    pub fn new(project: Project, options: SessionOptions) -> Self {
        Self {
            container: SceneContainer::new(project, options.mode),
            history: History::new(options.undo_limit),
            notes: Vec::new(),
            autosave: options.auto_save_interval.map(AutoSave::new),
            typing_in: None,
        }
    }

    /// Open previously saved state. History starts empty.
    pub fn from_saved(saved: SavedProject, options: SessionOptions) -> Self {
        let mut session = Self::new(saved.to_project(), options);
        session.notes = saved.notes;
        session
    }

    // ============ accessors ============

    /// The whole project as it stands, active scene included.
    pub fn project(&self) -> Project {
        self.container.project()
    }

    pub fn active_blocks(&self) -> &[Block] {
        self.container.active_blocks()
    }

    pub fn focus(&self) -> Focus {
        self.container.editor().focus()
    }

    pub fn current_scene_index(&self) -> usize {
        self.container.current_scene_index()
    }

    pub fn scene_count(&self) -> usize {
        self.container.scene_count()
    }

    pub fn notes(&self) -> &[Value] {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: Vec<Value>) {
        self.notes = notes;
        self.touch();
    }

    pub fn mode(&self) -> ClassificationMode {
        self.container.editor().mode()
    }

    pub fn set_mode(&mut self, mode: ClassificationMode) {
        log::info!("classification mode set to {mode:?}");
        self.container.editor_mut().set_mode(mode);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ============ block editing ============

    /// Apply an edit command to the active scene.
    ///
    /// Consecutive text edits to the same block share one undo entry; every
    /// other change that alters the blocks gets its own.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        if !cmd.is_mutation() {
            self.typing_in = None;
            return self.container.editor_mut().apply(cmd);
        }

        let scene = self.current_scene_index();
        let group = match &cmd {
            Cmd::EditText { index, .. } => Some((scene, *index)),
            _ => None,
        };
        let before = self.container.project();
        let patch = self.container.editor_mut().apply(cmd)?;

        if self.container.active_blocks() != before.scenes()[scene].blocks() {
            if group.is_none() || group != self.typing_in {
                self.history.record(Snapshot::capture(before));
            }
            self.touch();
        }
        self.typing_in = group;
        Ok(patch)
    }

    /// Translate and apply a key press. `Ok(None)` means the key is left to
    /// the front end.
    pub fn handle_key(&mut self, event: KeyEvent) -> Result<Option<Patch>, EditError> {
        match event.to_command(self.container.active_blocks()) {
            Some(cmd) => self.apply(cmd).map(Some),
            None => Ok(None),
        }
    }

    /// Close the current undo group so the next text edit starts a new one.
    pub fn checkpoint(&mut self) {
        self.typing_in = None;
    }

    // ============ scenes ============

    /// Switch to another scene. Not an undoable action.
    pub fn select_scene(&mut self, index: usize) -> Result<&[Block], EditError> {
        self.typing_in = None;
        self.container.load_scene(index)
    }

    pub fn add_scene(&mut self) -> usize {
        let before = self.container.project();
        let index = self.container.add_scene();
        self.record(before);
        index
    }

    pub fn delete_scene(&mut self, index: usize) -> Result<(), EditError> {
        self.structural(|c| c.delete_scene(index))
    }

    /// Remove/insert reorder, as from a scene list.
    pub fn reorder_scene(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        if from == to {
            return self.container.reorder_scene(from, to);
        }
        self.structural(|c| c.reorder_scene(from, to))
    }

    /// Positional swap, as from a scene board.
    pub fn swap_scenes(&mut self, a: usize, b: usize) -> Result<(), EditError> {
        if a == b {
            return self.container.swap_scenes(a, b);
        }
        self.structural(|c| c.swap_scenes(a, b))
    }

    // ============ history ============

    pub fn undo(&mut self) -> Result<(), EditError> {
        let current = Snapshot::capture(self.container.project());
        let previous = self.history.undo(current)?;
        self.container.restore(previous.into_project());
        self.typing_in = None;
        self.touch();
        log::info!("undo ({} steps left)", self.history.undo_depth());
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EditError> {
        let current = Snapshot::capture(self.container.project());
        let next = self.history.redo(current)?;
        self.container.restore(next.into_project());
        self.typing_in = None;
        self.touch();
        log::info!("redo");
        Ok(())
    }

    // ============ persistence ============

    /// Serializable state for a persistence collaborator.
    pub fn saved_state(&self) -> SavedProject {
        SavedProject::new(&self.container.project(), &self.notes, Utc::now())
    }

    /// Replace the whole session state with saved state. History is cleared.
    pub fn restore(&mut self, saved: SavedProject) {
        let mode = self.mode();
        self.container = SceneContainer::new(saved.to_project(), mode);
        self.notes = saved.notes;
        self.history.clear();
        self.typing_in = None;
        log::info!(
            "restored project with {} scenes",
            self.container.scene_count()
        );
    }

    /// Import a JSON document. `scenes` and `notes`, when present, replace
    /// the session's own wholesale and the first scene becomes active. A
    /// payload that does not parse changes nothing.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let payload = ImportPayload::parse(json)?;
        if payload.is_empty() {
            log::warn!("import payload has neither scenes nor notes");
            return Ok(());
        }

        if let Some(scenes) = payload.scenes {
            let before = self.container.project();
            let mode = self.mode();
            self.container = SceneContainer::new(Project::from_scenes(scenes, 0), mode);
            self.record(before);
        }
        if let Some(notes) = payload.notes {
            self.notes = notes;
            self.touch();
        }
        log::info!(
            "imported project: {} scenes, {} notes",
            self.container.scene_count(),
            self.notes.len()
        );
        Ok(())
    }

    /// Saved state to persist if the auto-save deadline has passed.
    pub fn poll_autosave(&mut self, now: Instant) -> Option<SavedProject> {
        let due = self.autosave.as_mut()?.take_due(now);
        due.then(|| {
            log::debug!("auto-save due");
            self.saved_state()
        })
    }

    pub fn autosave(&self) -> Option<&AutoSave> {
        self.autosave.as_ref()
    }

    // ============ read-only views ============

    pub fn projection(&self) -> ProjectedScript {
        export::project(&self.container.project())
    }

    pub fn export_package(&self, request: ExportRequest) -> ExportPackage {
        ExportPackage::build(request, &self.container.project(), &self.notes, Utc::now())
    }

    /// Build a package and render it in the requested format.
    pub fn export(&self, request: ExportRequest) -> Result<String, ExportError> {
        let format = request.format;
        export::render(&self.export_package(request), format)
    }

    pub fn report(&self) -> ScriptReport {
        stats::report(&self.container.project())
    }

    pub fn search(&self, query: &str, filter: SearchFilter) -> Vec<SearchResult> {
        search::search(&self.container.project(), &self.notes, query, filter)
    }

    fn structural(
        &mut self,
        op: impl FnOnce(&mut SceneContainer) -> Result<(), EditError>,
    ) -> Result<(), EditError> {
        let before = self.container.project();
        op(&mut self.container)?;
        self.record(before);
        Ok(())
    }

    fn record(&mut self, before: Project) {
        self.history.record(Snapshot::capture(before));
        self.typing_in = None;
        self.touch();
    }

    /// Re-arm auto-save after a completed change.
    fn touch(&mut self) {
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.schedule(Instant::now());
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Project::new(), SessionOptions::default())
    }
}
