//! Mermaid diagram header detection.
//!
//! A description is only sent to the rendering service when its first
//! significant line names a supported diagram type. Blank lines, `%%`
//! comments, `%%{init}%%` directives and a leading `---` front-matter block
//! are skipped.

use crate::error::RenderError;

/// Diagram type declared by a description's header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramHeader {
    /// `flowchart` or `graph`.
    Flowchart,
    /// `sequenceDiagram`.
    Sequence,
    /// `stateDiagram` or `stateDiagram-v2`.
    State,
    /// `classDiagram` or `classDiagram-v2`.
    Class,
}

impl DiagramHeader {
    fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "flowchart" | "graph" => Some(Self::Flowchart),
            "sequenceDiagram" => Some(Self::Sequence),
            "stateDiagram" | "stateDiagram-v2" => Some(Self::State),
            "classDiagram" | "classDiagram-v2" => Some(Self::Class),
            _ => None,
        }
    }
}

/// Detect the diagram header of `description`.
///
/// # Errors
///
/// Returns `RenderError::Syntax` if the description is empty, contains only
/// comments, or starts with an unknown diagram type. A comments-only
/// description reports its first comment, which is where generators put
/// their own error messages (e.g. `%% Error parsing Python code: ...`).
pub fn check_syntax(description: &str) -> Result<DiagramHeader, RenderError> {
    let mut first_comment: Option<&str> = None;
    let mut in_front_matter = false;
    let mut seen_content = false;

    for line in description.lines().map(str::trim) {
        if line == "---" && (in_front_matter || !seen_content) {
            in_front_matter = !in_front_matter;
            seen_content = true;
            continue;
        }
        if in_front_matter || line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix("%%") {
            if first_comment.is_none() && !comment.starts_with('{') {
                first_comment = Some(comment.trim());
            }
            continue;
        }

        let keyword = line
            .split(|c: char| c.is_whitespace() || c == ';')
            .next()
            .unwrap_or_default();
        return DiagramHeader::parse(keyword)
            .ok_or_else(|| RenderError::Syntax(format!("unknown diagram type `{keyword}`")));
    }

    if in_front_matter {
        return Err(RenderError::Syntax("unterminated front matter".to_owned()));
    }

    Err(RenderError::Syntax(match first_comment {
        Some(comment) if !comment.is_empty() => format!("no diagram found: {comment}"),
        _ => "diagram description is empty".to_owned(),
    }))
}
