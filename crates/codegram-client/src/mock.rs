//! Scripted generation service for testing.
//!
//! Provides [`ScriptedService`] for driving the session without a backend.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;

use codegram_core::SourceLanguage;
use tokio::sync::oneshot;

use crate::client::{DiagramRequest, GenerationService};
use crate::error::TransportError;
use crate::response::DiagramResponse;

type Reply = Result<DiagramResponse, TransportError>;

#[derive(Debug)]
enum ScriptedReply {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Generation service that answers from a queue of scripted replies.
///
/// Replies are handed out in call order. A deferred reply stays pending until
/// the test sends a value through the returned sender, which lets tests decide
/// the order in which concurrent requests complete.
///
/// # Example
///
/// ```ignore
/// let service = ScriptedService::new().with_reply(Ok(response));
/// let slow = service.deferred();
/// // ... later
/// slow.send(Ok(other_response)).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ScriptedService {
    replies: RefCell<VecDeque<ScriptedReply>>,
    calls: RefCell<Vec<DiagramRequest>>,
}

impl ScriptedService {
    /// Create a service with no scripted replies.
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

    /// Requests received so far, in call order.
    pub fn calls(&self) -> Vec<DiagramRequest> {
        self.calls.borrow().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl GenerationService for ScriptedService {
    fn request_diagram(&self, code: &str, lang: SourceLanguage) -> impl Future<Output = Reply> {
        self.calls
            .borrow_mut()
            .push(DiagramRequest::new(code, lang));
        let reply = self.replies.borrow_mut().pop_front();

        async move {
            match reply {
                Some(ScriptedReply::Ready(reply)) => reply,
                Some(ScriptedReply::Deferred(rx)) => match rx.await {
                    Ok(reply) => reply,
                    Err(_) => Err(TransportError::Http("scripted reply dropped".to_owned())),
                },
                None => Err(TransportError::Http("no scripted reply".to_owned())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegram_core::DiagramKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_replies_in_call_order() {
        let service = ScriptedService::new()
            .with_reply(Ok(DiagramResponse::from_variants([(
                DiagramKind::Flowchart,
                "flowchart TD",
            )])))
            .with_reply(Err(TransportError::Http("down".to_owned())));

        let first = service.request_diagram("a", SourceLanguage::Python).await;
        let second = service.request_diagram("b", SourceLanguage::Java).await;

        assert!(first.is_ok());
        assert_eq!(second, Err(TransportError::Http("down".to_owned())));
        assert_eq!(
            service.calls(),
            vec![
                DiagramRequest::new("a", SourceLanguage::Python),
                DiagramRequest::new("b", SourceLanguage::Java),
            ]
        );
    }

    #[tokio::test]
    async fn test_deferred_reply() {
        let service = ScriptedService::new();
        let tx = service.deferred();

        let pending = service.request_diagram("a", SourceLanguage::C);
        tx.send(Err(TransportError::Rejected("nope".to_owned())))
            .unwrap();

        assert_eq!(
            pending.await,
            Err(TransportError::Rejected("nope".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_exhausted_script_is_a_transport_error() {
        let service = ScriptedService::new();
        let result = service.request_diagram("a", SourceLanguage::C).await;
        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
