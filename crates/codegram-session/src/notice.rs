//! User-visible notices.

use crate::error::SessionError;

/// Which failure family a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Transport,
    ResponseShape,
}

/// Transient message shown to the user after a failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// Build the notice for a session error.
    #[must_use]
    pub fn from_error(error: &SessionError) -> Self {
        match error {
            SessionError::Validation(_) => Self {
                kind: NoticeKind::Validation,
                message: "Enter some code first!".to_owned(),
            },
            SessionError::Transport(e) => Self {
                kind: NoticeKind::Transport,
                message: format!("Error generating diagram: {e}. Check backend logs."),
            },
            SessionError::ResponseShape(e) => Self {
                kind: NoticeKind::ResponseShape,
                message: format!("Backend response is unusable: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use codegram_client::{ResponseShapeError, TransportError};
    use codegram_core::DiagramKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_notice_kinds_are_distinct() {
        let validation = Notice::from_error(&ValidationError::EmptyCode.into());
        let status = TransportError::Status {
            status: 500,
            body: "boom".to_owned(),
        };
        let transport = Notice::from_error(&status.into());
        let shape = Notice::from_error(&ResponseShapeError::Missing(DiagramKind::Class).into());

        assert_eq!(validation.kind, NoticeKind::Validation);
        assert_eq!(transport.kind, NoticeKind::Transport);
        assert_eq!(shape.kind, NoticeKind::ResponseShape);
        assert_eq!(
            transport.message,
            "Error generating diagram: HTTP 500: boom. Check backend logs."
        );
        assert_eq!(
            shape.message,
            "Backend response is unusable: response has no `class` diagram"
        );
    }
}
