//! Environment-backed logging configuration.

use super::events::LogLevel;
use std::env;

/// Minimum level emitted by the configured logger. Controlled by
/// `LEXGEN_LOG_LEVEL` (error, warn, info, debug); defaults to info.
pub fn get_min_log_level() -> LogLevel {
    match env::var("LEXGEN_LOG_LEVEL").ok().as_deref() {
        Some("error") => LogLevel::Error,
        Some("warn") | Some("warning") => LogLevel::Warning,
        Some("debug") => LogLevel::Debug,
        _ => LogLevel::Info,
    }
}

/// Whether to emit JSON lines instead of human-readable output.
/// Controlled by `LEXGEN_LOG_JSON`.
pub fn use_structured_logging() -> bool {
    env::var("LEXGEN_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}
