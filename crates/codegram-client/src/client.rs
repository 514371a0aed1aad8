//! HTTP client for the generation backend.
//!
//! One request, one response, no retries and no caching:
//!
//! ```text
//! POST <backend>/generate-diagram
//! { "code_snippet": "...", "language": "python" }
//! ```
//!
//! ureq is blocking, so the exchange runs on tokio's blocking pool and the
//! caller only sees an awaitable suspension point.

use std::future::Future;
use std::time::Duration;

use codegram_core::SourceLanguage;
use serde::Serialize;
use ureq::Agent;

use crate::error::TransportError;
use crate::response::DiagramResponse;

/// Something that can turn a code snippet into a multi-variant diagram response.
///
/// [`DiagramClient`] talks to the real backend; tests use scripted services.
pub trait GenerationService {
    /// Perform one request/response exchange.
    fn request_diagram(
        &self,
        code: &str,
        language: SourceLanguage,
    ) -> impl Future<Output = Result<DiagramResponse, TransportError>>;
}

/// Request body sent to the backend.
///
/// Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramRequest {
    pub code_snippet: String,
    pub language: SourceLanguage,
}

impl DiagramRequest {
    /// Create a new request body.
    pub fn new(code_snippet: impl Into<String>, language: SourceLanguage) -> Self {
        Self {
            code_snippet: code_snippet.into(),
            language,
        }
    }
}

/// Create HTTP agent with the specified timeout.
///
/// HTTP status codes are not turned into errors so that error bodies can be
/// read and reported.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// HTTP implementation of [`GenerationService`].
#[derive(Debug, Clone)]
pub struct DiagramClient {
    agent: Agent,
    url: String,
}

impl DiagramClient {
    /// Create a client for `base_url` + `path`.
    ///
    /// Trailing slashes on the base URL are ignored.
    pub fn new(base_url: &str, path: &str, timeout: Duration) -> Self {
        Self::with_agent(create_agent(timeout), base_url, path)
    }

    /// Create a client that reuses an existing agent.
    pub fn with_agent(agent: Agent, base_url: &str, path: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            agent,
            url: format!("{base_url}{path}"),
        }
    }

    /// Full endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GenerationService for DiagramClient {
    fn request_diagram(
        &self,
        code: &str,
        language: SourceLanguage,
    ) -> impl Future<Output = Result<DiagramResponse, TransportError>> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let request = DiagramRequest::new(code, language);

        async move {
            let task = tokio::task::spawn_blocking(move || send_request(&agent, &url, &request));
            match task.await {
                Ok(result) => result,
                Err(e) => Err(TransportError::Http(format!("request task failed: {e}"))),
            }
        }
    }
}

/// Send the request and decode the response body.
///
/// Handles HTTP errors by reading the response body for error details.
fn send_request(
    agent: &Agent,
    url: &str,
    request: &DiagramRequest,
) -> Result<DiagramResponse, TransportError> {
    tracing::debug!(%url, language = %request.language, "Requesting diagrams");

    let response = agent
        .post(url)
        .send_json(request)
        .map_err(|e| TransportError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if !(200..300).contains(&status) {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(TransportError::Status {
            status,
            body: error_body,
        });
    }

    let bytes = body
        .read_to_vec()
        .map_err(|e| TransportError::Http(e.to_string()))?;
    DiagramResponse::decode(&bytes)
}
