//! Internal constants for the generation client.

use std::time::Duration;

/// Default request path on the generation backend.
pub const DEFAULT_GENERATE_PATH: &str = "/generate-diagram";

/// Default HTTP timeout for generation requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
