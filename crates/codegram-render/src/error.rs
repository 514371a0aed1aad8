//! Render error types.

/// A diagram description could not be turned into a visual artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Description has no recognizable diagram header.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Rendering service rejected the description.
    #[error("renderer rejected diagram (HTTP {status}): {message}")]
    Backend {
        /// Response status code.
        status: u16,
        /// Error body returned by the service.
        message: String,
    },
    /// Rendering service could not be reached.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Rendering service answered with something that is not an SVG document.
    #[error("invalid SVG: {0}")]
    InvalidSvg(String),
}
