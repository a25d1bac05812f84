//! Shared constants for chatdash.
//!
//! Centralizes the defaults the dashboard pages hardcoded individually.

/// Rows per page on every paginated dashboard list.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size the backend accepts (`page_size` is validated `le=100` server-side).
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default API location when neither `--url` nor `CHATDASH_URL` is given.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reload period used by the logs page auto-refresh.
pub const DEFAULT_REFRESH_SECS: u64 = 60;

/// Placeholder shown for absent record fields.
pub const MISSING_VALUE: &str = "N/A";

/// Price per 1000 prompt tokens, in dollars.
pub const INPUT_RATE_PER_1K: f64 = 0.03;

/// Price per 1000 completion tokens, in dollars.
pub const OUTPUT_RATE_PER_1K: f64 = 0.06;

/// Env var holding the API base URL.
pub const ENV_BASE_URL: &str = "CHATDASH_URL";

/// Env var holding a bearer token that overrides the token file.
pub const ENV_TOKEN: &str = "CHATDASH_TOKEN";

/// Env var overriding the token file location.
pub const ENV_TOKEN_FILE: &str = "CHATDASH_TOKEN_FILE";

/// Env var overriding the page size.
pub const ENV_PAGE_SIZE: &str = "CHATDASH_PAGE_SIZE";

/// Env var overriding the HTTP timeout.
pub const ENV_TIMEOUT_SECS: &str = "CHATDASH_TIMEOUT_SECS";
