//! Session controller.
//!
//! All state lives behind `RefCell`s so that a new `generate()` can be started
//! while an earlier one is still awaiting the backend. Each call takes a
//! generation token up front; a response that arrives after a newer call was
//! started is discarded without touching state. Borrows are never held across
//! an `.await`.

use std::cell::RefCell;
use std::future::Future;

use codegram_client::{DiagramResponse, GenerationService, ResponseShapeError};
use codegram_core::{DiagramKind, GenerationToken, Sequencer, SourceLanguage, Submission};
use codegram_render::{DiagramRenderer, RenderBackend, RenderError, RenderOutcome};

use crate::error::{SessionError, ValidationError};
use crate::notice::Notice;

/// Result of a generate action that got as far as the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Display region shows the new diagram.
    Rendered,
    /// Display region shows an error placeholder.
    RenderFailed(RenderError),
    /// A newer action was started; this one's result was discarded.
    Superseded,
}

impl From<RenderOutcome> for GenerateOutcome {
    fn from(outcome: RenderOutcome) -> Self {
        match outcome {
            RenderOutcome::Rendered => Self::Rendered,
            RenderOutcome::Failed(error) => Self::RenderFailed(error),
            RenderOutcome::Superseded => Self::Superseded,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    submission: Submission,
    kind: DiagramKind,
    last_response: Option<DiagramResponse>,
    notice: Option<Notice>,
}

/// Owns the session state and orchestrates generation and rendering.
#[derive(Debug)]
pub struct SessionController<S, B> {
    service: S,
    renderer: DiagramRenderer<B>,
    sequencer: Sequencer,
    state: RefCell<SessionState>,
}

impl<S: GenerationService, B: RenderBackend> SessionController<S, B> {
    /// Create a session with empty code, Python, and flowchart selected.
    pub fn new(service: S, renderer: DiagramRenderer<B>) -> Self {
        Self {
            service,
            renderer,
            sequencer: Sequencer::new(),
            state: RefCell::new(SessionState::default()),
        }
    }

    /// Replace the code buffer.
    pub fn update_code(&self, code: impl Into<String>) {
        self.state.borrow_mut().submission.code = code.into();
    }

    /// Replace the declared source language.
    pub fn update_source_language(&self, language: SourceLanguage) {
        self.state.borrow_mut().submission.language = language;
    }

    /// Replace the active diagram kind.
    pub fn update_diagram_kind(&self, kind: DiagramKind) {
        self.state.borrow_mut().kind = kind;
    }

    /// Generate and render a diagram for the current submission.
    ///
    /// The submission is captured and the generation token is issued when this
    /// method is called, not when the future is first polled. Blank code fails
    /// immediately with [`ValidationError::EmptyCode`] and never reaches the
    /// network; it does not supersede a request already in flight.
    ///
    /// The description is selected with the diagram kind active when the
    /// response arrives.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for validation, transport and response-shape
    /// failures. Each one also records a [`Notice`] and leaves the display
    /// region unchanged.
    pub fn generate(&self) -> impl Future<Output = Result<GenerateOutcome, SessionError>> + '_ {
        let prepared = self.prepare();

        async move {
            let (token, submission) = prepared?;

            let result = self
                .service
                .request_diagram(&submission.code, submission.language)
                .await;

            if !self.sequencer.is_current(token) {
                tracing::debug!(token = token.get(), "Discarding superseded response");
                return Ok(GenerateOutcome::Superseded);
            }

            let response = result.map_err(|e| self.reject(e.into()))?;
            let description = {
                let mut state = self.state.borrow_mut();
                let selected = response.select(state.kind).map(str::to_owned);
                state.last_response = Some(response);
                selected
            };
            let description = description.map_err(|e| self.reject(e.into()))?;

            self.state.borrow_mut().notice = None;
            Ok(self.renderer.render(description).await.into())
        }
    }

    /// Render the active diagram kind from the last response without a
    /// network round trip.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResponseShape` if nothing has been generated yet
    /// or the active kind's variant is unusable.
    pub fn rerender(&self) -> impl Future<Output = Result<GenerateOutcome, SessionError>> + '_ {
        let selected = {
            let state = self.state.borrow();
            state
                .last_response
                .as_ref()
                .ok_or(ResponseShapeError::NoResponse)
                .and_then(|response| response.select(state.kind).map(str::to_owned))
        };
        let render = selected
            .map(|description| self.renderer.render(description))
            .map_err(|e| self.reject(e.into()));

        async move {
            let render = render?;
            self.state.borrow_mut().notice = None;
            Ok(render.await.into())
        }
    }

    /// Validate the submission and take a generation token.
    fn prepare(&self) -> Result<(GenerationToken, Submission), SessionError> {
        let submission = self.state.borrow().submission.clone();
        if submission.is_blank() {
            return Err(self.reject(ValidationError::EmptyCode.into()));
        }

        let token = self.sequencer.issue();
        // A render started by an older generation must not land after this one
        self.renderer.supersede();
        tracing::debug!(
            token = token.get(),
            language = %submission.language,
            "Starting generation"
        );
        Ok((token, submission))
    }

    /// Record the notice for `error` and hand the error back.
    fn reject(&self, error: SessionError) -> SessionError {
        let notice = Notice::from_error(&error);
        tracing::warn!(kind = ?notice.kind, "{}", notice.message);
        self.state.borrow_mut().notice = Some(notice);
        error
    }
}

impl<S, B> SessionController<S, B> {
    /// Current submission.
    pub fn submission(&self) -> Submission {
        self.state.borrow().submission.clone()
    }

    /// Active diagram kind.
    pub fn diagram_kind(&self) -> DiagramKind {
        self.state.borrow().kind
    }

    /// Most recent response that was not discarded as stale.
    pub fn last_response(&self) -> Option<DiagramResponse> {
        self.state.borrow().last_response.clone()
    }

    /// Latest notice, cleared by the next successful action.
    pub fn notice(&self) -> Option<Notice> {
        self.state.borrow().notice.clone()
    }

    /// The renderer owning the display region.
    pub fn renderer(&self) -> &DiagramRenderer<B> {
        &self.renderer
    }

    /// The generation service.
    pub fn service(&self) -> &S {
        &self.service
    }
}
