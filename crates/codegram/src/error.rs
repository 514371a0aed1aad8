//! CLI error types.

use codegram_config::ConfigError;
use codegram_session::SessionError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Render(String),

    #[error("{0}")]
    Validation(String),
}
