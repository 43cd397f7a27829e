//! Constants for the scribe-gh client

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// REST API version pinned on every request
pub const API_VERSION: &str = "2022-11-28";

/// Seconds an app assertion is backdated to absorb clock skew with GitHub
pub const ASSERTION_BACKDATE_SECS: i64 = 60;

/// Lifetime of an app assertion; GitHub rejects anything over ten minutes
pub const ASSERTION_LIFETIME_SECS: i64 = 600;

/// Installation tokens are refreshed this many seconds before they expire
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 30;
