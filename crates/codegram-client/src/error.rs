//! Client error types.

use codegram_core::DiagramKind;

/// Network or backend failure during a generation request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection failure, timeout or other HTTP-level error.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Backend answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },
    /// Response body could not be decoded as a diagram response.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Backend answered with an explicit error message instead of diagrams.
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// Response arrived but the variant for the active diagram kind is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseShapeError {
    /// No field for this kind in the response.
    #[error("response has no `{0}` diagram")]
    Missing(DiagramKind),
    /// The field exists but is not a string.
    #[error("`{0}` diagram is not text")]
    NotText(DiagramKind),
    /// The field is an empty or whitespace-only string.
    #[error("`{0}` diagram is empty")]
    Empty(DiagramKind),
    /// No response has been received yet.
    #[error("no diagram has been generated yet")]
    NoResponse,
}
