//! Global logging module for the custom logic engine
//!
//! Provides a thread-safe global logging service, per-thread call-site
//! context (which host component is validating) and a clean macro interface.
//! Nothing is emitted until a service is installed, so library consumers that
//! never initialize logging pay only for the level checks.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "log-bridge")]
pub use service::LogCrateLogger;
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static CALL_SITE: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::lexical::INVALID_CHARACTERS,
        codes::validation::MISSING_REQUIRED_INDEX,
    ] {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (hosts that bring their own backend, tests)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// CALL-SITE CONTEXT
// ============================================================================

/// Set the host component name for events logged on this thread
pub fn set_call_site(name: &str) {
    CALL_SITE.with(|ctx| {
        *ctx.borrow_mut() = Some(name.to_string());
    });
}

/// Clear call-site context for current thread
pub fn clear_call_site() {
    CALL_SITE.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with call-site context, restoring the previous one afterwards
pub fn with_call_site<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = current_call_site();
    set_call_site(name);
    let result = f();
    match previous {
        Some(previous) => set_call_site(&previous),
        None => clear_call_site(),
    }
    result
}

/// Get current call-site context (used by macros)
pub fn current_call_site() -> Option<String> {
    CALL_SITE.with(|ctx| ctx.borrow().clone())
}

fn attach_context(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(call_site) = current_call_site() {
        event = event.with_context("call_site", &call_site);
    }
    event
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    if let Some(logger) = try_get_global_logger() {
        let mut event = attach_context(LogEvent::error(code, message), context);
        if let Some(s) = span {
            event = event.with_span(s);
        }
        logger.log_event(event);
    }
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_context(LogEvent::success(code, message), context));
    }
}

/// Log an uncoded event at the given level (used by log_info!, log_warning!, log_debug!)
pub fn log_with_level(level: LogLevel, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        if !logger.should_log(level) {
            return;
        }
        let event = match level {
            LogLevel::Warning => LogEvent::warning(message),
            LogLevel::Debug => LogEvent::debug(message),
            _ => LogEvent::info(message),
        };
        logger.log_event(attach_context(event, context));
    }
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(call_site) = current_call_site() {
        diagnostics.push_str(&format!("Call site: {}\n", call_site));
    }
    diagnostics.push_str(&config::get_config_summary());
    diagnostics.push('\n');

    diagnostics
}
