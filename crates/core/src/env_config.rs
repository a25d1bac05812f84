//! Environment variable parsing with warn-level logging for invalid values.

use crate::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, ENV_PAGE_SIZE, ENV_TIMEOUT_SECS, MAX_PAGE_SIZE,
};

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_or_default(var, std::env::var(var).ok().as_deref(), default)
}

fn parse_or_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Page size from `CHATDASH_PAGE_SIZE`, clamped to `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn page_size_from_env() -> u32 {
    clamp_page_size(env_parse_with_default(ENV_PAGE_SIZE, DEFAULT_PAGE_SIZE))
}

/// HTTP timeout from `CHATDASH_TIMEOUT_SECS`.
#[must_use]
pub fn timeout_secs_from_env() -> u64 {
    env_parse_with_default(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS).max(1)
}

/// Keeps a requested page size inside what the backend accepts.
#[must_use]
pub fn clamp_page_size(requested: u32) -> u32 {
    requested.clamp(1, MAX_PAGE_SIZE)
}
