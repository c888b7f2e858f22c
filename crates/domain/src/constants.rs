//! Application constants
//!
//! Defaults applied when configuration omits a value, and the bounds
//! configuration is validated against.

// HTTP transport
/// Request timeout when `http.timeout_secs` is not configured
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Largest accepted `http.timeout_secs`
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 600;
/// User-Agent header sent with every request
pub const DEFAULT_USER_AGENT: &str = "tailspin-surveys-web";

// Token cache
/// Maximum number of cached tokens
pub const DEFAULT_TOKEN_CACHE_CAPACITY: u64 = 10_000;
/// Upper bound on how long a token stays cached
pub const DEFAULT_TOKEN_CACHE_TTL_SECS: u64 = 3_600;
/// Refresh 5 minutes before expiry
pub const DEFAULT_TOKEN_REFRESH_THRESHOLD_SECS: u64 = 300;
/// Largest accepted refresh threshold (one day)
pub const MAX_TOKEN_REFRESH_THRESHOLD_SECS: u64 = 86_400;

/// Scope strings in configuration are semicolon-delimited
pub const SCOPE_DELIMITER: char = ';';
