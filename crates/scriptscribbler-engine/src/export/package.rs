use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ExportError;
use super::projection::{ProjectedScript, project};
use crate::models::{Project, Scene};

pub const PACKAGE_VERSION: &str = "1.0";

/// Target file format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Xml,
    Fountain,
    /// Fixed-indentation plain text. Not real PDF.
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Xml,
        ExportFormat::Fountain,
        ExportFormat::Pdf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Fountain => "fountain",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Xml => "application/xml",
            ExportFormat::Fountain | ExportFormat::Pdf => "text/plain",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Fountain => "fountain",
            ExportFormat::Pdf => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))
    }
}

/// Which parts of the project go into a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportContent {
    #[default]
    Full,
    Scenes,
    Notes,
}

impl ExportContent {
    pub fn includes_script(self) -> bool {
        matches!(self, ExportContent::Full | ExportContent::Scenes)
    }

    pub fn includes_notes(self) -> bool {
        matches!(self, ExportContent::Full | ExportContent::Notes)
    }
}

impl FromStr for ExportContent {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ExportContent::Full),
            "scenes" => Ok(ExportContent::Scenes),
            "notes" => Ok(ExportContent::Notes),
            _ => Err(ExportError::UnknownContent(s.to_string())),
        }
    }
}

/// Caller choices for building a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub title: String,
    pub export_type: String,
    pub format: ExportFormat,
    pub content: ExportContent,
    pub target: String,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            title: "Untitled Screenplay".to_string(),
            export_type: "screenplay".to_string(),
            format: ExportFormat::default(),
            content: ExportContent::default(),
            target: "local".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub title: String,
    pub export_type: String,
    pub format: ExportFormat,
    pub content: ExportContent,
    pub target: String,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

/// Everything an exporter writes out, before format rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPackage {
    pub metadata: ExportMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenes: Option<Vec<Scene>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ProjectedScript>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Value>>,
}

impl ExportPackage {
    pub fn build(
        request: ExportRequest,
        project_state: &Project,
        notes: &[Value],
        exported_at: DateTime<Utc>,
    ) -> Self {
        let content = request.content;
        let (scenes, script) = if content.includes_script() {
            let settled = Project::from_scenes(
                project_state.scenes().iter().map(Scene::settled).collect(),
                project_state.current_scene_index(),
            );
            let script = project(&settled);
            (Some(settled.scenes().to_vec()), Some(script))
        } else {
            (None, None)
        };
        let notes = content.includes_notes().then(|| notes.to_vec());

        log::debug!(
            "built {} export package {:?} ({:?})",
            request.format,
            request.title,
            content
        );

        Self {
            metadata: ExportMetadata {
                title: request.title,
                export_type: request.export_type,
                format: request.format,
                content,
                target: request.target,
                exported_at,
                version: PACKAGE_VERSION.to_string(),
            },
            scenes,
            script,
            notes,
        }
    }
}

/// File name for an export: whitespace runs in the title become `_`.
pub fn suggested_filename(title: &str, format: ExportFormat) -> String {
    let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
    let stem = if stem.is_empty() { "untitled" } else { &stem };
    format!("{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockType};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn sample_project() -> Project {
        Project::from_scenes(
            vec![Scene::new(vec![
                Block::new(BlockType::SceneHeading, "INT. LAB - NIGHT "),
                Block::new(BlockType::Character, ""),
                Block::new(BlockType::Action, "Sparks."),
            ])],
            0,
        )
    }

    fn exported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case(ExportFormat::Json, "application/json", "json")]
    #[case(ExportFormat::Xml, "application/xml", "xml")]
    #[case(ExportFormat::Fountain, "text/plain", "fountain")]
    #[case(ExportFormat::Pdf, "text/plain", "txt")]
    fn test_format_mime_and_extension(
        #[case] format: ExportFormat,
        #[case] mime: &str,
        #[case] extension: &str,
    ) {
        assert_eq!(format.mime_type(), mime);
        assert_eq!(format.extension(), extension);
        assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(name)) if name == "docx"
        ));
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    }

    #[rstest]
    #[case("My Great  Script", ExportFormat::Pdf, "My_Great_Script.txt")]
    #[case("Pilot", ExportFormat::Fountain, "Pilot.fountain")]
    #[case("   ", ExportFormat::Json, "untitled.json")]
    fn test_suggested_filename(
        #[case] title: &str,
        #[case] format: ExportFormat,
        #[case] expected: &str,
    ) {
        assert_eq!(suggested_filename(title, format), expected);
    }

    #[test]
    fn test_full_package_carries_everything() {
        let notes = vec![json!({"title": "Idea"})];
        let package = ExportPackage::build(
            ExportRequest::default(),
            &sample_project(),
            &notes,
            exported_at(),
        );

        assert_eq!(package.metadata.version, "1.0");
        assert_eq!(package.notes, Some(notes));
        let scenes = package.scenes.unwrap();
        assert_eq!(
            scenes[0].blocks(),
            &[
                Block::new(BlockType::SceneHeading, "INT. LAB - NIGHT"),
                Block::new(BlockType::Action, "Sparks."),
            ]
        );
        assert_eq!(package.script.unwrap().lines.len(), 2);
    }

    #[test]
    fn test_script_lines_come_from_settled_scenes() {
        let project = Project::from_scenes(
            vec![Scene::new(vec![
                Block::new(BlockType::Character, "MAYA"),
                Block::new(BlockType::Dialogue, "   Hello there.  "),
            ])],
            0,
        );

        let package =
            ExportPackage::build(ExportRequest::default(), &project, &[], exported_at());

        let scenes = package.scenes.as_ref().unwrap();
        let script = package.script.as_ref().unwrap();
        assert_eq!(scenes[0].blocks()[1].text, "Hello there.");
        assert_eq!(script.lines[1].content, "Hello there.");

        let text = crate::export::render(&package, ExportFormat::Pdf).unwrap();
        assert!(text.ends_with(&format!("\n\n{}Hello there.", " ".repeat(10))));
    }

    #[test]
    fn test_notes_only_package_omits_script() {
        let request = ExportRequest {
            content: ExportContent::Notes,
            ..ExportRequest::default()
        };
        let package = ExportPackage::build(request, &sample_project(), &[], exported_at());
        assert!(package.script.is_none());
        assert!(package.scenes.is_none());

        let json = serde_json::to_value(&package).unwrap();
        assert!(json.get("script").is_none());
        assert_eq!(json["metadata"]["exportType"], "screenplay");
        assert_eq!(json["metadata"]["content"], "notes");
    }

    #[test]
    fn test_scenes_package_omits_notes() {
        let request = ExportRequest {
            content: ExportContent::Scenes,
            ..ExportRequest::default()
        };
        let package = ExportPackage::build(
            request,
            &sample_project(),
            &[json!({"title": "x"})],
            exported_at(),
        );
        assert!(package.notes.is_none());
        assert!(package.script.is_some());
    }
}
