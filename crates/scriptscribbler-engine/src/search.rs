//! Case-insensitive search across scene text, notes and character names.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::models::Project;
use crate::stats;

const PREVIEW_BEFORE: usize = 30;
const PREVIEW_AFTER: usize = 70;
const NOTE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    #[default]
    All,
    Scenes,
    Notes,
    Characters,
}

impl SearchFilter {
    fn scenes(self) -> bool {
        matches!(self, SearchFilter::All | SearchFilter::Scenes)
    }

    fn notes(self) -> bool {
        matches!(self, SearchFilter::All | SearchFilter::Notes)
    }

    fn characters(self) -> bool {
        matches!(self, SearchFilter::All | SearchFilter::Characters)
    }
}

impl FromStr for SearchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SearchFilter::All),
            "scenes" => Ok(SearchFilter::Scenes),
            "notes" => Ok(SearchFilter::Notes),
            "characters" => Ok(SearchFilter::Characters),
            other => Err(format!("unknown search filter: {other}")),
        }
    }
}

/// Where a hit lives, so a front end can navigate to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchTarget {
    Scene { index: usize, block: usize },
    Note { index: usize },
    Character { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub target: SearchTarget,
    pub title: String,
    pub preview: String,
}

/// Search a project and its notes. Results come grouped as scenes, then
/// notes, then characters. An empty query finds nothing.
pub fn search(project: &Project, notes: &[Value], query: &str, filter: SearchFilter) -> Vec<SearchResult> {
    let needle: Vec<char> = query.trim().chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();

    if filter.scenes() {
        for (index, scene) in project.scenes().iter().enumerate() {
            for (block, b) in scene.blocks().iter().enumerate() {
                if let Some(at) = find_ignore_case(&b.text, &needle) {
                    results.push(SearchResult {
                        target: SearchTarget::Scene { index, block },
                        title: format!("Scene {}", index + 1),
                        preview: preview(&b.text, at, needle.len()),
                    });
                }
            }
        }
    }

    if filter.notes() {
        for (index, note) in notes.iter().enumerate() {
            let title = note_title(note);
            let haystack = format!("{title} {note}");
            if find_ignore_case(&haystack, &needle).is_some() {
                results.push(SearchResult {
                    target: SearchTarget::Note { index },
                    title: title.to_string(),
                    preview: note_preview(note),
                });
            }
        }
    }

    if filter.characters() {
        for character in stats::character_stats(project) {
            if find_ignore_case(&character.name, &needle).is_some() {
                results.push(SearchResult {
                    preview: format!("Appears in {} scene(s)", character.scenes),
                    title: character.name.clone(),
                    target: SearchTarget::Character {
                        name: character.name,
                    },
                });
            }
        }
    }

    log::debug!("search {query:?} ({filter:?}): {} results", results.len());
    results
}

/// Char offset in `text` where the lowercased `needle` first occurs.
fn find_ignore_case(text: &str, needle: &[char]) -> Option<usize> {
    let mut lowered = Vec::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        for l in c.to_lowercase() {
            lowered.push(l);
            origin.push(i);
        }
    }
    lowered
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|p| origin[p])
}

fn preview(text: &str, at: usize, len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = at.saturating_sub(PREVIEW_BEFORE);
    let end = (at + len + PREVIEW_AFTER).min(chars.len());

    let mut out = String::new();
    if start > 0 {
        out.push_str("...");
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push_str("...");
    }
    out
}

fn note_title(note: &Value) -> &str {
    note.get("title").and_then(Value::as_str).unwrap_or("")
}

/// Summary text of a note, picked by note type.
fn note_preview(note: &Value) -> String {
    let fields: &[&str] = match note.get("type").and_then(Value::as_str) {
        Some("character") => &["charNoteAdditional", "charNoteGoal"],
        Some("world") => &["worldNoteDescription", "worldNoteAdditional"],
        Some("object") => &["objectNoteDescription", "objectNoteSignificance"],
        Some("plot") => &["plotNoteSummary", "plotNoteDetails"],
        _ => &["content"],
    };
    let text = fields
        .iter()
        .filter_map(|f| note.get(*f).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("");

    if text.chars().count() > NOTE_PREVIEW_CHARS {
        let cut: String = text.chars().take(NOTE_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
