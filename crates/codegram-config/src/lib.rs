//! Configuration management for Codegram.
//!
//! Parses `codegram.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [backend]
//! url = "http://127.0.0.1:8000"
//! path = "/generate-diagram"
//! timeout_secs = 30
//!
//! [renderer]
//! kroki_url = "https://kroki.io"
//! timeout_secs = 30
//!
//! [session]
//! language = "python"
//! kind = "flowchart"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `backend.url` and `renderer.kroki_url` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use codegram_core::{DiagramKind, SourceLanguage};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "codegram.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override generation backend base URL.
    pub backend_url: Option<String>,
    /// Override Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
    /// Override initial source language.
    pub language: Option<SourceLanguage>,
    /// Override initial diagram kind.
    pub kind: Option<DiagramKind>,
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Generation backend configuration.
    pub backend: BackendConfig,
    /// Diagram renderer configuration.
    pub renderer: RendererConfig,
    /// Initial selector values (names as strings from TOML).
    session: SessionConfigRaw,

    /// Resolved session defaults (set after loading).
    #[serde(skip)]
    pub session_resolved: SessionConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Generation backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL.
    pub url: String,
    /// Request path appended to the base URL.
    pub path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000".to_owned(),
            path: "/generate-diagram".to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Diagram renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Kroki server URL.
    pub kroki_url: String,
    /// Render request timeout in seconds.
    pub timeout_secs: u64,
}

impl RendererConfig {
    /// Render request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kroki_url: "https://kroki.io".to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Raw session configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SessionConfigRaw {
    language: Option<String>,
    kind: Option<String>,
}

/// Resolved initial selector values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Source language selected when a session starts.
    pub language: SourceLanguage,
    /// Diagram kind selected when a session starts.
    pub kind: DiagramKind,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`backend.url`").
        field: String,
        /// Error message (e.g., "${`BACKEND_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        let message = format!("{field} must start with http:// or https://");
        return Err(ConfigError::Validation(message));
    }
    Ok(())
}

/// Require a timeout to be positive.
fn require_timeout(secs: u64, field: &str) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation(format!("{field} must be greater than 0")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `codegram.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated again
    /// after overrides.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.backend_url {
            self.backend.url.clone_from(url);
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.renderer.kroki_url.clone_from(kroki_url);
        }
        if let Some(language) = settings.language {
            self.session_resolved.language = language;
        }
        if let Some(kind) = settings.kind {
            self.session_resolved.kind = kind;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.resolve_session()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.backend.url, "backend.url")?;
        require_http_url(&self.backend.url, "backend.url")?;
        if !self.backend.path.starts_with('/') {
            return Err(ConfigError::Validation("backend.path must start with /".to_owned()));
        }
        require_timeout(self.backend.timeout_secs, "backend.timeout_secs")?;

        require_non_empty(&self.renderer.kroki_url, "renderer.kroki_url")?;
        require_http_url(&self.renderer.kroki_url, "renderer.kroki_url")?;
        require_timeout(self.renderer.timeout_secs, "renderer.timeout_secs")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.backend.url = expand::expand_url(&self.backend.url, "backend.url")?;
        self.renderer.kroki_url =
            expand::expand_url(&self.renderer.kroki_url, "renderer.kroki_url")?;
        self.session.language =
            expand::expand_selector(self.session.language.as_deref(), "session.language")?;
        self.session.kind = expand::expand_selector(self.session.kind.as_deref(), "session.kind")?;
        Ok(())
    }

    /// Resolve selector names from `[session]` into typed values.
    fn resolve_session(&mut self) -> Result<(), ConfigError> {
        let language = match self.session.language.as_deref() {
            Some(name) => SourceLanguage::parse(name).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "session.language must be one of python, java, c (got `{name}`)"
                ))
            })?,
            None => SourceLanguage::default(),
        };
        let kind = match self.session.kind.as_deref() {
            Some(name) => DiagramKind::parse(name).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "session.kind must be one of flowchart, sequence, statemachine, class (got `{name}`)"
                ))
            })?,
            None => DiagramKind::default(),
        };

        self.session_resolved = SessionConfig { language, kind };
        Ok(())
    }
}
