//! Session error types.

use codegram_client::{ResponseShapeError, TransportError};

/// Submission is not fit to be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Code is empty or whitespace-only.
    #[error("no code to generate a diagram from")]
    EmptyCode,
}

/// Failure of a generate action, surfaced to the user as a notice.
///
/// Render failures are not part of this type: they are shown in the display
/// region and reported through `GenerateOutcome::RenderFailed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    ResponseShape(#[from] ResponseShapeError),
}
