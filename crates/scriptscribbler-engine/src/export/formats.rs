//! Deterministic renderers from an export package to file contents.

use chrono::SecondsFormat;
use html_escape::encode_quoted_attribute;

use super::ExportError;
use super::package::{ExportFormat, ExportPackage};
use super::projection::{ProjectedScript, ScriptLine};
use crate::models::BlockType;

/// Render a package in the given format.
pub fn render(package: &ExportPackage, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(package),
        ExportFormat::Xml => Ok(to_xml(package)),
        ExportFormat::Fountain => Ok(to_fountain(required_script(package)?)),
        ExportFormat::Pdf => Ok(to_plain_text(required_script(package)?)),
    }
}

pub fn to_json(package: &ExportPackage) -> Result<String, ExportError> {
    serde_json::to_string_pretty(package).map_err(ExportError::Json)
}

pub fn to_xml(package: &ExportPackage) -> String {
    let meta = &package.metadata;
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<screenplay>\n");
    out.push_str("    <metadata>\n");
    out.push_str(&format!(
        "        <title>{}</title>\n",
        encode_quoted_attribute(&meta.title)
    ));
    out.push_str(&format!(
        "        <exportType>{}</exportType>\n",
        encode_quoted_attribute(&meta.export_type)
    ));
    out.push_str(&format!(
        "        <exportedAt>{}</exportedAt>\n",
        meta.exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str("    </metadata>\n    <script>\n");
    for line in package.script.iter().flat_map(|s| &s.lines) {
        out.push_str(&format!(
            "        <line format=\"{}\">{}</line>\n",
            line.format,
            encode_quoted_attribute(&line.content)
        ));
    }
    out.push_str("    </script>\n</screenplay>");
    out
}

/// Fountain-style text: headings and cues uppercased, parentheticals
/// wrapped, one blank line between elements.
pub fn to_fountain(script: &ProjectedScript) -> String {
    join_lines(script, fountain_line)
}

/// Plain text with fixed indents for cues, dialogue and parentheticals.
pub fn to_plain_text(script: &ProjectedScript) -> String {
    join_lines(script, |line| {
        format!("{}{}", " ".repeat(indent(line.format)), line.content)
    })
}

fn fountain_line(line: &ScriptLine) -> String {
    match line.format {
        BlockType::SceneHeading | BlockType::Character => line.content.to_uppercase(),
        BlockType::Parenthetical => {
            let text = line.content.trim();
            if text.starts_with('(') && text.ends_with(')') {
                text.to_string()
            } else {
                format!("({})", text.trim_start_matches('(').trim_end_matches(')'))
            }
        }
        BlockType::Action | BlockType::Dialogue => line.content.clone(),
    }
}

fn indent(format: BlockType) -> usize {
    match format {
        BlockType::Character => 20,
        BlockType::Parenthetical => 16,
        BlockType::Dialogue => 10,
        BlockType::SceneHeading | BlockType::Action => 0,
    }
}

fn join_lines(script: &ProjectedScript, render_line: impl Fn(&ScriptLine) -> String) -> String {
    script
        .lines
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn required_script(package: &ExportPackage) -> Result<&ProjectedScript, ExportError> {
    package.script.as_ref().ok_or(ExportError::MissingScript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::package::{ExportContent, ExportRequest};
    use crate::models::{Block, Project, Scene};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn script_project() -> Project {
        Project::from_scenes(
            vec![Scene::new(vec![
                Block::new(BlockType::SceneHeading, "int. kitchen - day"),
                Block::new(BlockType::Action, "Kettle whistles."),
                Block::new(BlockType::Character, "sarah"),
                Block::new(BlockType::Parenthetical, "quietly"),
                Block::new(BlockType::Dialogue, "Tea & <biscuits>?"),
                Block::new(BlockType::Parenthetical, "(beat)"),
            ])],
            0,
        )
    }

    fn package(content: ExportContent) -> ExportPackage {
        let request = ExportRequest {
            title: "Kitchen Sink".to_string(),
            content,
            ..ExportRequest::default()
        };
        ExportPackage::build(
            request,
            &script_project(),
            &[],
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_fountain_output() {
        let package = package(ExportContent::Full);
        insta::assert_snapshot!(to_fountain(package.script.as_ref().unwrap()), @r"
        INT. KITCHEN - DAY

        Kettle whistles.

        SARAH

        (quietly)

        Tea & <biscuits>?

        (beat)
        ");
    }

    #[test]
    fn test_plain_text_indents() {
        let package = package(ExportContent::Full);
        let text = to_plain_text(package.script.as_ref().unwrap());
        let lines: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(lines[0], "int. kitchen - day");
        assert_eq!(lines[2], format!("{}sarah", " ".repeat(20)));
        assert_eq!(lines[3], format!("{}quietly", " ".repeat(16)));
        assert_eq!(lines[4], format!("{}Tea & <biscuits>?", " ".repeat(10)));
    }

    #[test]
    fn test_xml_escapes_content() {
        let xml = to_xml(&package(ExportContent::Full));

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<screenplay>"));
        assert!(xml.contains("<title>Kitchen Sink</title>"));
        assert!(xml.contains("<exportedAt>2024-03-01T12:00:00.000Z</exportedAt>"));
        assert!(xml.contains("<line format=\"dialogue\">Tea &amp; &lt;biscuits"));
        assert!(!xml.contains("<biscuits"));
        assert!(xml.ends_with("</script>\n</screenplay>"));
    }

    #[test]
    fn test_xml_without_script_has_empty_script_element() {
        let xml = to_xml(&package(ExportContent::Notes));
        assert!(xml.contains("    <script>\n    </script>"));
    }

    #[test]
    fn test_text_formats_need_a_script() {
        let notes_only = package(ExportContent::Notes);
        assert!(matches!(
            render(&notes_only, ExportFormat::Fountain),
            Err(ExportError::MissingScript)
        ));
        assert!(matches!(
            render(&notes_only, ExportFormat::Pdf),
            Err(ExportError::MissingScript)
        ));
        assert!(render(&notes_only, ExportFormat::Json).is_ok());
    }

    #[test]
    fn test_json_render_is_pretty_and_parseable() {
        let rendered = render(&package(ExportContent::Full), ExportFormat::Json).unwrap();
        assert!(rendered.contains("\n  \"metadata\": {"));
        let back: ExportPackage = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, package(ExportContent::Full));
    }
}
