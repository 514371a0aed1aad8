//! Render state and the rendering target.

/// Visual artifact produced from a diagram description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Description the artifact was rendered from.
    pub description: String,
    /// SVG document.
    pub svg: String,
}

/// Outcome of the most recent render that was allowed to complete.
///
/// `Empty` until the first render finishes. There is no terminal state: every
/// completed render replaces the previous value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Empty,
    Rendered(Artifact),
    Failed(String),
}

impl RenderState {
    /// The current artifact, if the last render succeeded.
    #[must_use]
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Rendered(artifact) => Some(artifact),
            _ => None,
        }
    }

    /// Failure reason, if the last render failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Short name for logs and status lines.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Rendered(_) => "rendered",
            Self::Failed(_) => "failed",
        }
    }
}

/// Content of the display region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderTarget {
    /// Nothing rendered yet.
    #[default]
    Blank,
    /// A rendered SVG document.
    Artifact(String),
    /// An HTML error placeholder shown instead of an artifact.
    Placeholder(String),
}

impl RenderTarget {
    /// Markup currently shown in the display region.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Blank => "",
            Self::Artifact(svg) => svg,
            Self::Placeholder(html) => html,
        }
    }

    /// Whether the region shows an error placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Error placeholder shown in place of a diagram that failed to render.
#[must_use]
pub fn placeholder_html(reason: &str) -> String {
    format!(
        r#"<p class="diagram-error" style="color:red">Failed to render diagram: {}</p>"#,
        escape_html(reason)
    )
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
