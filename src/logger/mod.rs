//! Structured logging for the recency cache
//!
//! This module provides a small, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Colored console output
//!
//! ## Usage
//!
//! ```rust
//! use recency_cache::logger::{self, LogTag};
//!
//! logger::error(LogTag::Config, "Failed to parse config file");
//! logger::info(LogTag::Stress, "Stress run finished");
//! logger::debug(LogTag::Cache, "Evicted entry"); // Only if --debug-cache
//! logger::verbose(LogTag::Cache, "Created cache"); // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Binaries call `logger::init()` once at startup, after the argument store
//! has been populated. Libraries never call it; the default configuration
//! shows Info and above.

mod config;
mod core;
mod format;
mod levels;
mod tags;

// Re-export public types
pub use config::{
    config_from_args, get_logger_config, init_from_args, is_debug_enabled_for_tag,
    is_verbose_enabled_for_tag, set_logger_config, LoggerConfig,
};
pub use self::core::should_log;
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger from command-line arguments
pub fn init() {
    config::init_from_args();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless the threshold is Error)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (only with --debug-<module> for the tag, or --verbose)
///
/// Build expensive messages behind [`is_debug_enabled_for_tag`].
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose or --verbose-<module>)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
