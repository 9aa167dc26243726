//! Environment variable names read by
//! [`LoggerConfig::from_env`](crate::config::LoggerConfig::from_env).
//!
//! These are purely helpers; adapters themselves never touch the
//! environment.

/// `production` (JSON lines) or `development` (coloured console lines).
pub const LOG_FACADE_MODE_ENV: &str = "LOG_FACADE_MODE";

/// Minimum level name; unknown names fall back to `info`.
pub const LOG_FACADE_LEVEL_ENV: &str = "LOG_FACADE_LEVEL";

/// `stdout`, `stderr` or a file path.
pub const LOG_FACADE_OUTPUT_ENV: &str = "LOG_FACADE_OUTPUT";

/// `strict` or `legacy` level mapping.
pub const LOG_FACADE_MAPPING_ENV: &str = "LOG_FACADE_MAPPING";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
