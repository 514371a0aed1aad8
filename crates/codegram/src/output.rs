//! Terminal reporting for notices, render outcomes and session status.

use std::fmt::Display;

use codegram_session::{GenerateOutcome, Notice, NoticeKind};
use console::{Style, Term};

/// Width of the name column in status lines, colon included.
const STATUS_NAME_WIDTH: usize = 14;

/// Terminal output formatter.
///
/// Writes to stderr so that stdout stays free for rendered documents.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a session notice.
    ///
    /// Validation notices are hints and print yellow. Transport and
    /// response-shape notices print red.
    pub(crate) fn notice(&self, notice: &Notice) {
        let style = match notice.kind {
            NoticeKind::Validation => &self.yellow,
            NoticeKind::Transport | NoticeKind::ResponseShape => &self.red,
        };
        let _ = self
            .term
            .write_line(&style.apply_to(&notice.message).to_string());
    }

    /// Report how a generate or render request finished.
    pub(crate) fn outcome(&self, outcome: &GenerateOutcome) {
        match outcome {
            GenerateOutcome::Rendered => self.success("Diagram rendered"),
            GenerateOutcome::RenderFailed(err) => self.error(&format!("Render failed: {err}")),
            GenerateOutcome::Superseded => self.info("Superseded by a newer request"),
        }
    }

    /// Print a `name: value` status line with the name dimmed.
    pub(crate) fn field(&self, name: &str, value: impl Display) {
        let name = self.dim.apply_to(status_name(name));
        let _ = self.term.write_line(&format!("{name} {value}"));
    }
}

/// Pad a status name so values line up in one column.
fn status_name(name: &str) -> String {
    let label = format!("{name}:");
    format!("{label:<width$}", width = STATUS_NAME_WIDTH)
}
