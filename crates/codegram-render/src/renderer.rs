//! Diagram renderer owning the display region.
//!
//! [`DiagramRenderer::render`] takes a render token the moment it is called.
//! When the backend round trip finishes, the result is applied only if no
//! newer render was started in the meantime. Later renders supersede earlier
//! ones instead of queueing behind them, so the target always reflects the
//! most recently initiated render that has completed.
//!
//! State transitions (every one triggered by a `render` call):
//!
//! ```text
//! Empty | Rendered | Failed --success--> Rendered
//! Empty | Rendered | Failed --failure--> Failed
//! ```

use std::cell::{Ref, RefCell};
use std::future::Future;

use codegram_core::Sequencer;

use crate::error::RenderError;
use crate::state::{Artifact, RenderState, RenderTarget, placeholder_html};
use crate::syntax::check_syntax;

/// Black-box service that turns a diagram description into SVG.
pub trait RenderBackend {
    /// Render `description` to an SVG document.
    fn render_svg(&self, description: &str) -> impl Future<Output = Result<String, RenderError>>;
}

/// Result of a single [`DiagramRenderer::render`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Target now shows the new artifact.
    Rendered,
    /// Target now shows an error placeholder.
    Failed(RenderError),
    /// A newer render was started; this result was discarded.
    Superseded,
}

/// Renders diagram descriptions into a single exclusively-owned target.
///
/// Not `Sync`: state lives in `RefCell`s and is only touched from the
/// session's thread. No borrow is held across an `.await`.
#[derive(Debug)]
pub struct DiagramRenderer<B> {
    backend: B,
    sequencer: Sequencer,
    state: RefCell<RenderState>,
    target: RefCell<RenderTarget>,
}

impl<B: RenderBackend> DiagramRenderer<B> {
    /// Create a renderer with an empty target.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sequencer: Sequencer::new(),
            state: RefCell::new(RenderState::Empty),
            target: RefCell::new(RenderTarget::Blank),
        }
    }

    /// Render `description` into the target.
    ///
    /// The render token is taken synchronously, before the returned future is
    /// polled. Safe to call while earlier renders are still in flight.
    pub fn render(
        &self,
        description: impl Into<String>,
    ) -> impl Future<Output = RenderOutcome> + '_ {
        let description = description.into();
        let token = self.sequencer.issue();

        async move {
            let result = match check_syntax(&description) {
                Ok(_) => self
                    .backend
                    .render_svg(&description)
                    .await
                    .and_then(validate_svg),
                Err(e) => Err(e),
            };

            if !self.sequencer.is_current(token) {
                tracing::debug!(token = token.get(), "Discarding superseded render");
                return RenderOutcome::Superseded;
            }

            self.apply(description, result)
        }
    }

    /// Publish a render result to state and target.
    fn apply(&self, description: String, result: Result<String, RenderError>) -> RenderOutcome {
        match result {
            Ok(svg) => {
                tracing::info!(bytes = svg.len(), "Diagram rendered");
                *self.target.borrow_mut() = RenderTarget::Artifact(svg.clone());
                *self.state.borrow_mut() = RenderState::Rendered(Artifact { description, svg });
                RenderOutcome::Rendered
            }
            Err(error) => {
                let reason = error.to_string();
                tracing::warn!(%reason, "Diagram render failed");
                *self.target.borrow_mut() = RenderTarget::Placeholder(placeholder_html(&reason));
                *self.state.borrow_mut() = RenderState::Failed(reason);
                RenderOutcome::Failed(error)
            }
        }
    }
}

impl<B> DiagramRenderer<B> {
    /// Invalidate every render still in flight without starting a new one.
    ///
    /// Their results are discarded as [`RenderOutcome::Superseded`] and the
    /// target keeps its current content.
    pub fn supersede(&self) {
        let token = self.sequencer.issue();
        tracing::debug!(token = token.get(), "Superseding in-flight renders");
    }

    /// Snapshot of the current render state.
    pub fn state(&self) -> RenderState {
        self.state.borrow().clone()
    }

    /// Current display region content.
    ///
    /// Do not hold the returned guard across an `.await`.
    pub fn target(&self) -> Ref<'_, RenderTarget> {
        self.target.borrow()
    }

    /// The rendering service.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Reject service responses that are not SVG documents.
fn validate_svg(svg: String) -> Result<String, RenderError> {
    if svg.contains("<svg") {
        Ok(svg)
    } else {
        Err(RenderError::InvalidSvg("response is not an SVG document".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedBackend;
    use pretty_assertions::assert_eq;

    const FLOWCHART: &str = "graph TD; A-->B;";

    #[tokio::test]
    async fn test_initial_state_is_empty() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());
        assert_eq!(renderer.state(), RenderState::Empty);
        assert_eq!(*renderer.target(), RenderTarget::Blank);
    }

    #[tokio::test]
    async fn test_render_success() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());

        let outcome = renderer.render(FLOWCHART).await;

        assert_eq!(outcome, RenderOutcome::Rendered);
        let state = renderer.state();
        let artifact = state.artifact().unwrap();
        assert_eq!(artifact.description, FLOWCHART);
        assert_eq!(
            *renderer.target(),
            RenderTarget::Artifact(artifact.svg.clone())
        );
        assert_eq!(renderer.backend().calls(), vec![FLOWCHART.to_owned()]);
    }

    #[tokio::test]
    async fn test_render_twice_is_idempotent() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());

        renderer.render(FLOWCHART).await;
        let first = renderer.state();
        renderer.render(FLOWCHART).await;
        let second = renderer.state();

        assert!(matches!(first, RenderState::Rendered(_)));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_description_shows_placeholder() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());
        renderer.render(FLOWCHART).await;

        let outcome = renderer.render("this is not a diagram").await;

        assert!(matches!(outcome, RenderOutcome::Failed(RenderError::Syntax(_))));
        assert_eq!(
            renderer.state(),
            RenderState::Failed("syntax error: unknown diagram type `this`".to_owned())
        );
        let target = renderer.target();
        assert!(target.is_placeholder());
        assert!(target.content().contains("Failed to render diagram"));
        // Syntax errors never reach the service
        assert_eq!(renderer.backend().call_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_shows_placeholder() {
        let backend = ScriptedBackend::new().with_reply(Err(RenderError::Backend {
            status: 400,
            message: "Parse error on line 2".to_owned(),
        }));
        let renderer = DiagramRenderer::new(backend);

        let outcome = renderer.render("graph TD\nA-->").await;

        assert!(matches!(outcome, RenderOutcome::Failed(RenderError::Backend { .. })));
        let state = renderer.state();
        assert!(state.failure().unwrap().contains("Parse error on line 2"));
        assert!(renderer.target().is_placeholder());
    }

    #[tokio::test]
    async fn test_non_svg_response_is_a_failure() {
        let backend = ScriptedBackend::new().with_reply(Ok("<html>oops</html>".to_owned()));
        let renderer = DiagramRenderer::new(backend);

        let outcome = renderer.render(FLOWCHART).await;

        assert!(matches!(outcome, RenderOutcome::Failed(RenderError::InvalidSvg(_))));
        assert!(renderer.target().is_placeholder());
    }

    #[tokio::test]
    async fn test_failed_then_success_recovers() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());

        renderer.render("nonsense").await;
        assert!(renderer.state().failure().is_some());

        let outcome = renderer.render(FLOWCHART).await;
        assert_eq!(outcome, RenderOutcome::Rendered);
        assert!(!renderer.target().is_placeholder());
    }

    #[tokio::test]
    async fn test_failed_then_failed_replaces_reason() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());

        renderer.render("first").await;
        renderer.render("second").await;

        assert_eq!(
            renderer.state(),
            RenderState::Failed("syntax error: unknown diagram type `second`".to_owned())
        );
    }

    #[tokio::test]
    async fn test_stale_render_does_not_overwrite_newer() {
        let backend = ScriptedBackend::new();
        let slow = backend.deferred();
        let fast = backend.deferred();
        let renderer = DiagramRenderer::new(backend);

        let first = renderer.render("graph TD; Old-->Render;");
        let second = renderer.render("graph TD; New-->Render;");

        let drive = async {
            fast.send(Ok("<svg>new</svg>".to_owned())).unwrap();
            tokio::task::yield_now().await;
            slow.send(Ok("<svg>old</svg>".to_owned())).unwrap();
        };
        let (first, second, ()) = tokio::join!(first, second, drive);

        assert_eq!(first, RenderOutcome::Superseded);
        assert_eq!(second, RenderOutcome::Rendered);
        assert_eq!(
            *renderer.target(),
            RenderTarget::Artifact("<svg>new</svg>".to_owned())
        );
    }

    #[tokio::test]
    async fn test_supersede_discards_in_flight_render() {
        let backend = ScriptedBackend::new();
        let slow = backend.deferred();
        let renderer = DiagramRenderer::new(backend);

        let pending = renderer.render(FLOWCHART);
        renderer.supersede();

        let drive = async {
            slow.send(Ok("<svg>late</svg>".to_owned())).unwrap();
        };
        let (outcome, ()) = tokio::join!(pending, drive);

        assert_eq!(outcome, RenderOutcome::Superseded);
        assert_eq!(renderer.state(), RenderState::Empty);
        assert_eq!(*renderer.target(), RenderTarget::Blank);
    }

    #[tokio::test]
    async fn test_render_after_supersede_applies() {
        let renderer = DiagramRenderer::new(ScriptedBackend::new());

        renderer.supersede();
        let outcome = renderer.render(FLOWCHART).await;

        assert_eq!(outcome, RenderOutcome::Rendered);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_replace_newer_artifact() {
        let backend = ScriptedBackend::new();
        let slow = backend.deferred();
        let renderer = DiagramRenderer::new(backend);

        let first = renderer.render(FLOWCHART);
        let second = renderer.render("classDiagram\nclass Foo");

        let drive = async {
            slow.send(Err(RenderError::Http("timed out".to_owned())))
                .unwrap();
        };
        let (first, second, ()) = tokio::join!(first, second, drive);

        assert_eq!(first, RenderOutcome::Superseded);
        assert_eq!(second, RenderOutcome::Rendered);
        assert_eq!(
            renderer.state().artifact().unwrap().description,
            "classDiagram\nclass Foo"
        );
    }
}
