//! Diagram rendering for Codegram.
//!
//! This crate turns Mermaid diagram descriptions into SVG artifacts and owns
//! the single display region they are shown in:
//! - [`DiagramRenderer`] owns [`RenderState`] and the [`RenderTarget`]
//! - [`RenderBackend`] is the black-box rendering service seam
//! - [`KrokiBackend`] renders via a Kroki server over HTTP
//! - [`check_syntax`] rejects descriptions without a known diagram header
//!   before any round trip
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - `renderer`: `DiagramRenderer`, render tokens and state transitions
//! - `kroki`: HTTP rendering via Kroki
//! - `syntax`: Mermaid header detection
//! - `state`: `RenderState`, `RenderTarget` and the error placeholder
//!
//! # Example
//!
//! ```ignore
//! use codegram_render::{DiagramRenderer, KrokiBackend};
//!
//! let renderer = DiagramRenderer::new(KrokiBackend::new("https://kroki.io", timeout));
//! renderer.render("graph TD; A-->B;").await;
//! println!("{}", renderer.target().content());
//! ```

mod consts;
mod error;
mod kroki;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod renderer;
mod state;
mod syntax;

pub use consts::{DEFAULT_KROKI_URL, DEFAULT_TIMEOUT};
pub use error::RenderError;
pub use kroki::{KrokiBackend, create_agent};
#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedBackend;
pub use renderer::{DiagramRenderer, RenderBackend, RenderOutcome};
pub use state::{Artifact, RenderState, RenderTarget, escape_html, placeholder_html};
pub use syntax::{DiagramHeader, check_syntax};
