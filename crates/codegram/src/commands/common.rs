//! Arguments and wiring shared by every command.

use std::path::PathBuf;

use clap::Args;
use codegram_client::DiagramClient;
use codegram_config::{CliSettings, Config};
use codegram_core::{DiagramKind, SourceLanguage};
use codegram_render::{DiagramRenderer, KrokiBackend};
use codegram_session::SessionController;

use crate::error::CliError;

/// Session wired to the HTTP backend and Kroki.
pub(crate) type AppSession = SessionController<DiagramClient, KrokiBackend>;

/// Connection and session options.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Source language: python, java or c.
    #[arg(short, long, value_parser = parse_language)]
    language: Option<SourceLanguage>,

    /// Diagram kind: flowchart, sequence, statemachine or class.
    #[arg(short, long, value_parser = parse_kind)]
    kind: Option<DiagramKind>,

    /// Diagram generation backend base URL.
    #[arg(long, env = "CODEGRAM_BACKEND_URL")]
    backend_url: Option<String>,

    /// Kroki server URL.
    #[arg(long, env = "CODEGRAM_KROKI_URL")]
    kroki_url: Option<String>,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CommonArgs {
    /// Load configuration with these arguments applied on top.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            backend_url: self.backend_url.clone(),
            kroki_url: self.kroki_url.clone(),
            language: self.language,
            kind: self.kind,
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Build a session from configuration, seeded with its session defaults.
pub(crate) fn build_session(config: &Config) -> AppSession {
    let client = DiagramClient::new(
        &config.backend.url,
        &config.backend.path,
        config.backend.timeout(),
    );
    let backend = KrokiBackend::new(&config.renderer.kroki_url, config.renderer.timeout());
    tracing::info!(
        backend = client.url(),
        kroki = backend.server_url(),
        "Session configured"
    );

    let session = SessionController::new(client, DiagramRenderer::new(backend));
    session.update_source_language(config.session_resolved.language);
    session.update_diagram_kind(config.session_resolved.kind);
    session
}

pub(crate) fn parse_language(value: &str) -> Result<SourceLanguage, String> {
    SourceLanguage::parse(value).ok_or_else(|| {
        format!(
            "unknown language `{value}` (expected one of: {})",
            join_names(SourceLanguage::ALL.into_iter().map(SourceLanguage::as_str))
        )
    })
}

pub(crate) fn parse_kind(value: &str) -> Result<DiagramKind, String> {
    DiagramKind::parse(value).ok_or_else(|| {
        format!(
            "unknown diagram kind `{value}` (expected one of: {})",
            join_names(DiagramKind::ALL.into_iter().map(DiagramKind::as_str))
        )
    })
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_language_is_case_insensitive() {
        assert_eq!(parse_language("Java"), Ok(SourceLanguage::Java));
    }

    #[test]
    fn test_parse_language_lists_choices() {
        assert_eq!(
            parse_language("rust"),
            Err("unknown language `rust` (expected one of: python, java, c)".to_owned())
        );
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("statemachine"), Ok(DiagramKind::StateMachine));
        let err = parse_kind("gantt").unwrap_err();
        assert!(err.contains("flowchart, sequence"));
    }

    #[test]
    fn test_build_session_uses_session_defaults() {
        let mut config = Config::default();
        config.session_resolved.language = SourceLanguage::C;
        config.session_resolved.kind = DiagramKind::Class;

        let session = build_session(&config);

        assert_eq!(session.submission().language, SourceLanguage::C);
        assert_eq!(session.diagram_kind(), DiagramKind::Class);
    }
}
