//! Configuration access for logging
//!
//! Buffer and message limits are compile-time constants; verbosity and
//! output format are runtime preferences.

use crate::config::compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH};
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences (first call wins)
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Get minimum log level
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level
}

/// Check if structured logging is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Maximum number of events retained by buffering loggers
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

/// Maximum length of a single log message
pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Human-readable summary of the active logging configuration
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();
    format!(
        "Logging: min_level={}, structured={}, buffer={}, max_message={}",
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("min_level="));
        assert!(summary.contains(&format!("buffer={}", LOG_BUFFER_SIZE)));
    }
}
