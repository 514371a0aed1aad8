//! Scripted render backend for testing.
//!
//! Provides [`ScriptedBackend`] for exercising the renderer without Kroki.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;

use tokio::sync::oneshot;

use crate::error::RenderError;
use crate::renderer::RenderBackend;
use crate::state::escape_html;

type Reply = Result<String, RenderError>;

#[derive(Debug)]
enum ScriptedReply {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Render backend that answers from a queue of scripted replies.
///
/// When the queue is empty it renders deterministically: the same description
/// always yields the same SVG.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<ScriptedReply>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedBackend {
    /// Create a backend that echoes every description into an SVG.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply that resolves immediately.
    #[must_use]
    pub fn with_reply(self, reply: Reply) -> Self {
        self.replies
            .borrow_mut()
            .push_back(ScriptedReply::Ready(reply));
        self
    }

    /// Queue a reply that resolves when the returned sender is used.
    pub fn deferred(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .borrow_mut()
            .push_back(ScriptedReply::Deferred(rx));
        tx
    }

    /// Descriptions received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of render requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// SVG produced for `description` when no reply is scripted.
    #[must_use]
    pub fn echo_svg(description: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><text>{}</text></svg>"#,
            escape_html(description)
        )
    }
}

impl RenderBackend for ScriptedBackend {
    fn render_svg(&self, description: &str) -> impl Future<Output = Reply> {
        self.calls.borrow_mut().push(description.to_owned());
        let reply = self.replies.borrow_mut().pop_front();
        let echo = Self::echo_svg(description);

        async move {
            match reply {
                Some(ScriptedReply::Ready(reply)) => reply,
                Some(ScriptedReply::Deferred(rx)) => match rx.await {
                    Ok(reply) => reply,
                    Err(_) => Err(RenderError::Http("scripted reply dropped".to_owned())),
                },
                None => Ok(echo),
            }
        }
    }
}
