//! Export: project a scene model into neutral line records, wrap them in a
//! package with metadata, and render the package as JSON, XML, Fountain or
//! indented plain text.

pub mod formats;
pub mod package;
pub mod projection;

use thiserror::Error;

pub use formats::render;
pub use package::{
    ExportContent, ExportFormat, ExportMetadata, ExportPackage, ExportRequest, suggested_filename,
};
pub use projection::{ProjectedScene, ProjectedScript, ScriptLine, Statistics, project};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
    #[error("Unknown export content: {0}")]
    UnknownContent(String),
    #[error("Export format needs script content, but the package has none")]
    MissingScript,
    #[error("Failed to serialize export: {0}")]
    Json(#[source] serde_json::Error),
}
