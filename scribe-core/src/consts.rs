//! Core constants shared across scribe components.

/// Branch used when a file descriptor does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Base URL for the official SaaS GitHub API
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Upper bound applied to every remote call unless configured otherwise.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the GitHub API base URL.
pub const ENV_API_URL: &str = "SCRIBE_API_URL";

/// Environment variable overriding the per-request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SCRIBE_TIMEOUT_SECS";

/// Environment variable holding the default log verbosity (0-3).
pub const ENV_VERBOSITY: &str = "SCRIBE_VERBOSITY";
