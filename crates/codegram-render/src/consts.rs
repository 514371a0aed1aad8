//! Internal constants for diagram rendering.

use std::time::Duration;

/// Public Kroki instance used when no server is configured.
pub const DEFAULT_KROKI_URL: &str = "https://kroki.io";

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Kroki endpoint for Mermaid descriptions.
pub(crate) const MERMAID_ENDPOINT: &str = "mermaid";
