//! Client for the Codegram diagram generation backend.
//!
//! The backend takes a code snippet and its language and answers with all
//! four diagram variants at once. This crate owns that wire contract:
//!
//! - [`DiagramClient`]: HTTP implementation of [`GenerationService`]
//! - [`DiagramResponse`]: decoded multi-variant response with per-kind selection
//! - [`TransportError`] / [`ResponseShapeError`]: the two failure families
//!
//! The diagram kind is never sent to the backend. Selecting the variant the
//! caller wants happens after the response arrives, via
//! [`DiagramResponse::select`].
//!
//! # Example
//!
//! ```ignore
//! use codegram_client::{DiagramClient, GenerationService};
//! use codegram_core::{DiagramKind, SourceLanguage};
//!
//! let client = DiagramClient::new("http://127.0.0.1:8000", "/generate-diagram", timeout);
//! let response = client.request_diagram("print(1)", SourceLanguage::Python).await?;
//! let flowchart = response.select(DiagramKind::Flowchart)?;
//! ```

mod client;
mod consts;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod response;

pub use client::{DiagramClient, DiagramRequest, GenerationService, create_agent};
pub use consts::{DEFAULT_GENERATE_PATH, DEFAULT_TIMEOUT};
pub use error::{ResponseShapeError, TransportError};
#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedService;
pub use response::DiagramResponse;
