//! Logger configuration and command-line driven setup
//!
//! Stored process-wide; reads happen on every log call so the lock is a
//! `parking_lot::RwLock` and callers never clone the sets on the hot path.
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug/Verbose also need a flag)
    pub min_level: LogLevel,

    /// Tags with `--debug-<tag>` enabled
    pub debug_tags: HashSet<String>,

    /// Tags with `--verbose-<tag>` enabled
    pub verbose_tags: HashSet<String>,

    /// If non-empty, only these tags are shown (errors always pass)
    pub enabled_tags: HashSet<String>,

    /// Colorize console output
    pub use_colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            use_colors: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Run `f` against the live configuration under a read lock
pub(super) fn with_logger_config<R>(f: impl FnOnce(&LoggerConfig) -> R) -> R {
    f(&LOGGER_CONFIG.read())
}

/// Build configuration from a list of arguments
///
/// Recognised flags:
/// - `--quiet` → warnings and errors only
/// - `--verbose` → everything, including verbose output for all tags
/// - `--debug-<tag>` / `--verbose-<tag>` → per-tag gates
/// - `--log-level <level>` → explicit threshold
/// - `--no-color` → plain output
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for (i, arg) in args.iter().enumerate() {
        match arg.as_str() {
            "--quiet" => config.min_level = LogLevel::Warning,
            "--verbose" => config.min_level = LogLevel::Verbose,
            "--no-color" => config.use_colors = false,
            "--log-level" => {
                if let Some(level) = args.get(i + 1).and_then(|v| LogLevel::parse(v)) {
                    config.min_level = level;
                }
            }
            other => {
                if let Some(tag) = other.strip_prefix("--debug-") {
                    config.debug_tags.insert(tag.to_lowercase());
                } else if let Some(tag) = other.strip_prefix("--verbose-") {
                    config.verbose_tags.insert(tag.to_lowercase());
                }
            }
        }
    }

    // A debug flag is meaningless under an Info threshold.
    if !config.debug_tags.is_empty() && config.min_level < LogLevel::Debug {
        config.min_level = LogLevel::Debug;
    }

    config
}

/// Configure the logger from the process-wide argument store
pub fn init_from_args() {
    let args = arguments::get_cmd_args();
    set_logger_config(config_from_args(&args));
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    with_logger_config(|config| debug_enabled(config, tag))
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    with_logger_config(|config| verbose_enabled(config, tag))
}

pub(super) fn debug_enabled(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.min_level >= LogLevel::Debug
        && (config.debug_tags.contains(&tag.to_debug_key())
            || config.min_level == LogLevel::Verbose)
}

pub(super) fn verbose_enabled(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.min_level == LogLevel::Verbose || config.verbose_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = config_from_args(&args(&["tool"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(!debug_enabled(&config, &LogTag::Cache));
        assert!(!verbose_enabled(&config, &LogTag::Cache));
    }

    #[test]
    fn test_debug_flag_is_per_tag() {
        let config = config_from_args(&args(&["tool", "--debug-cache"]));
        assert!(debug_enabled(&config, &LogTag::Cache));
        assert!(!debug_enabled(&config, &LogTag::Config));
    }

    #[test]
    fn test_verbose_enables_everything() {
        let config = config_from_args(&args(&["tool", "--verbose"]));
        assert!(debug_enabled(&config, &LogTag::Stress));
        assert!(verbose_enabled(&config, &LogTag::Cache));
    }

    #[test]
    fn test_quiet_and_explicit_level() {
        let config = config_from_args(&args(&["tool", "--quiet"]));
        assert_eq!(config.min_level, LogLevel::Warning);

        let config = config_from_args(&args(&["tool", "--log-level", "error", "--no-color"]));
        assert_eq!(config.min_level, LogLevel::Error);
        assert!(!config.use_colors);
    }

    #[test]
    fn test_verbose_tag_flag() {
        let config = config_from_args(&args(&["tool", "--verbose-config"]));
        assert!(verbose_enabled(&config, &LogTag::Config));
        assert!(!verbose_enabled(&config, &LogTag::Cache));
    }
}
