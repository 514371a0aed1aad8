//! Environment variable expansion for `codegram.toml` values.
//!
//! Only `${VAR}` and `${VAR:-default}` are expanded. Service URLs are
//! normalized after expansion, and the `[session]` selectors may be taken from
//! the environment as well.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Strings without `${` are returned unchanged, so bare `$VAR` and URLs that
/// happen to contain `$` pass through untouched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand a service base URL and drop trailing slashes.
///
/// Request paths are appended to the result, so `https://kroki.io/` and
/// `https://kroki.io` must resolve to the same endpoints.
pub(crate) fn expand_url(value: &str, field: &str) -> Result<String, ConfigError> {
    let url = expand_env(value, field)?;
    Ok(url.trim().trim_end_matches('/').to_owned())
}

/// Expand an optional selector such as `session.language`.
///
/// A value that expands to an empty string counts as unset, so
/// `${CODEGRAM_KIND:-}` falls back to the built-in default.
pub(crate) fn expand_selector(
    value: Option<&str>,
    field: &str,
) -> Result<Option<String>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let expanded = expand_env(value, field)?;
    let trimmed = expanded.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);
