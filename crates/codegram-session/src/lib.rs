//! Session orchestration for Codegram.
//!
//! [`SessionController`] owns the user-facing state (code buffer, source
//! language, diagram kind, last backend response, latest notice) and drives
//! one generate action end to end:
//!
//! ```text
//! generate() -> GenerationService (network) -> select kind -> DiagramRenderer (render)
//! ```
//!
//! Failures before rendering become a [`Notice`] and leave the display region
//! untouched. Render failures are shown in the display region itself.

mod controller;
mod error;
mod notice;

pub use controller::{GenerateOutcome, SessionController};
pub use error::{SessionError, ValidationError};
pub use notice::{Notice, NoticeKind};
