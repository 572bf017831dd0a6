//! Configuration utilities - loading, reloading, and access helpers
//!
//! This module provides utility functions for working with the configuration system:
//! - Loading configuration from disk
//! - Reloading configuration at runtime
//! - Thread-safe access helpers
use super::schemas::Config;
use crate::errors::{CacheError, CacheResult, ConfigurationError};
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::Path;

/// Global configuration instance
///
/// This is the single source of truth for all configuration values.
/// Access it using the helper functions below.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Read and validate a config file without touching the global instance
///
/// A missing file yields the defaults; an unreadable or malformed file is an
/// error.
pub fn parse_config_file(path: &str) -> CacheResult<Config> {
    let config = if Path::new(path).exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CacheError::config_error(format!("Failed to read config file '{}': {}", path, e))
        })?;

        toml::from_str::<Config>(&contents).map_err(|e| ConfigurationError::Parse {
            path: path.to_string(),
            error: e.to_string(),
        })?
    } else {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file path and initialize the global CONFIG
///
/// This should be called once at startup; the tool passes `CONFIG_FILE_PATH`
/// unless `--config` overrides it.
pub fn load_config_from_path(path: &str) -> CacheResult<()> {
    let config = parse_config_file(path)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| CacheError::config_error("Config already initialized"))?;

    logger::debug(LogTag::Config, &format!("Loaded configuration from '{}'", path));
    Ok(())
}

/// Reload configuration from a specific file path
///
/// The file must exist. The configuration is atomically replaced, so reads
/// are always consistent.
pub fn reload_config_from_path(path: &str) -> CacheResult<()> {
    if !Path::new(path).exists() {
        return Err(ConfigurationError::FileNotFound {
            path: path.to_string(),
        }
        .into());
    }
    let new_config = parse_config_file(path)?;

    let config_lock = CONFIG.get().ok_or_else(|| {
        CacheError::config_error("Config not initialized. Call load_config_from_path() first.")
    })?;
    *config_lock.write() = new_config;

    logger::debug(LogTag::Config, &format!("Reloaded configuration from '{}'", path));
    Ok(())
}

/// Run `f` against the current configuration under a read lock
///
/// Falls back to defaults if nothing has been loaded yet.
pub fn with_config<R>(f: impl FnOnce(&Config) -> R) -> R {
    let lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    f(&lock.read())
}

/// Clone of the current configuration
pub fn get_config_clone() -> Config {
    with_config(Config::clone)
}
