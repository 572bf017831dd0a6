//! Core logging implementation with automatic filtering
//!
//! Filtering rules:
//! 1. Errors are always shown
//! 2. Debug level requires --debug-<module> (or --verbose) for that tag
//! 3. Verbose level requires --verbose or --verbose-<module> for that tag
//! 4. Other levels are checked against the minimum threshold
//! 5. If enabled_tags is non-empty, tag must be in the set
use super::config::{debug_enabled, verbose_enabled, with_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

pub(super) fn should_log_with(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    match level {
        LogLevel::Error => return true,
        LogLevel::Debug => {
            if !debug_enabled(config, tag) {
                return false;
            }
        }
        LogLevel::Verbose => {
            if !verbose_enabled(config, tag) {
                return false;
            }
        }
        _ => {
            if level > config.min_level {
                return false;
            }
        }
    }

    config.enabled_tags.is_empty() || config.enabled_tags.contains(&tag.to_debug_key())
}

pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    with_logger_config(|config| should_log_with(config, tag, level))
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    let use_colors = match with_logger_config(|config| {
        should_log_with(config, &tag, level).then_some(config.use_colors)
    }) {
        Some(use_colors) => use_colors,
        None => return,
    };

    super::format::format_and_log(&tag, level, message, use_colors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::config_from_args;

    fn config(list: &[&str]) -> LoggerConfig {
        let args: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        config_from_args(&args)
    }

    #[test]
    fn test_errors_always_pass() {
        let quiet = config(&["tool", "--log-level", "error"]);
        assert!(should_log_with(&quiet, &LogTag::Cache, LogLevel::Error));
        assert!(!should_log_with(&quiet, &LogTag::Cache, LogLevel::Warning));
    }

    #[test]
    fn test_debug_gated_by_tag() {
        let cfg = config(&["tool", "--debug-cache"]);
        assert!(should_log_with(&cfg, &LogTag::Cache, LogLevel::Debug));
        assert!(!should_log_with(&cfg, &LogTag::Stress, LogLevel::Debug));
        assert!(should_log_with(&cfg, &LogTag::Stress, LogLevel::Info));
    }

    #[test]
    fn test_verbose_tag_bypasses_threshold() {
        let cfg = config(&["tool", "--verbose-cache"]);
        assert!(should_log_with(&cfg, &LogTag::Cache, LogLevel::Verbose));
        assert!(!should_log_with(&cfg, &LogTag::Cache, LogLevel::Debug));
    }

    #[test]
    fn test_enabled_tags_filter() {
        let mut cfg = config(&["tool"]);
        cfg.enabled_tags.insert("stress".to_string());
        assert!(should_log_with(&cfg, &LogTag::Stress, LogLevel::Info));
        assert!(!should_log_with(&cfg, &LogTag::Cache, LogLevel::Info));
        assert!(should_log_with(&cfg, &LogTag::Cache, LogLevel::Error));
    }
}
