//! Structured error handling for the recency cache
//!
//! A cache miss is never an error: `get` returns `Option`. Errors only arise
//! from configuration (construction, config loading) and from explicit
//! invariant audits.
use thiserror::Error;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Rejected configuration; no cache instance is produced
    #[error("Configuration Error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Internal structure disagrees with itself (reported by `check_invariants`)
    #[error("Invariant Violation: {reason}")]
    InvariantViolation { reason: String },
}

pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// CONFIGURATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid config field '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },

    #[error("{message}")]
    Generic { message: String },
}

// =============================================================================
// HELPER CONSTRUCTORS
// =============================================================================

impl CacheError {
    /// Create an invalid-field configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CacheError::Configuration(ConfigurationError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Create a generic configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CacheError::Configuration(ConfigurationError::Generic {
            message: message.into(),
        })
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        CacheError::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// True for errors raised while building or loading configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, CacheError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = CacheError::invalid_config("capacity", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Configuration Error: Invalid config field 'capacity': must be greater than zero"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invariant_display() {
        let err = CacheError::invariant("index has 3 keys, list has 2 entries");
        assert_eq!(
            err.to_string(),
            "Invariant Violation: index has 3 keys, list has 2 entries"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_from_configuration_error() {
        let err: CacheError = ConfigurationError::FileNotFound {
            path: "data/config.toml".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            CacheError::Configuration(ConfigurationError::FileNotFound { .. })
        ));
    }
}
