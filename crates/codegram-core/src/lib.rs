//! Shared types for Codegram.
//!
//! Everything here is plain data that the client, renderer and session crates
//! agree on:
//! - [`SourceLanguage`] and [`DiagramKind`]: the two user-facing selectors
//! - [`Submission`]: the code buffer plus its declared language
//! - [`Sequencer`] / [`GenerationToken`]: last-issued-wins ordering for
//!   asynchronous completions

mod language;
mod sequence;
mod submission;

pub use language::{DiagramKind, SourceLanguage};
pub use sequence::{GenerationToken, Sequencer};
pub use submission::Submission;
