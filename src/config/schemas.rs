//! Configuration schemas - all config structures defined once with defaults
//!
//! Each struct is defined using the config_struct! macro which provides:
//! - Single-source definition (no repetition)
//! - Embedded defaults
//! - Serde support
use crate::cache::CacheConfig;
use crate::config_struct;
use crate::errors::{CacheError, CacheResult};

// ============================================================================
// CACHE CONFIGURATION
// ============================================================================

config_struct! {
    /// Cache sizing
    pub struct CacheSection {
        /// Maximum number of entries held at once
        capacity: usize = 1024,

        /// Independently locked partitions; 1 keeps a single global recency order
        shards: usize = 1,
    }
}

impl CacheSection {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::sharded(self.capacity, self.shards)
    }
}

// ============================================================================
// STRESS TOOL CONFIGURATION
// ============================================================================

config_struct! {
    /// Workload for tool_cache_stress
    pub struct StressSection {
        threads: usize = 8,
        operations_per_thread: usize = 10_000,

        /// Distinct keys each thread draws from
        key_space: usize = 4096,

        /// Fraction of operations that are `get` (the rest are `put`)
        read_ratio: f64 = 0.7,

        /// Audit invariants every N operations per thread (0 = only at the end)
        check_every: usize = 1000,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration file layout (data/config.toml)
    pub struct Config {
        cache: CacheSection = CacheSection::default(),
        stress: StressSection = StressSection::default(),
    }
}

impl Config {
    pub fn validate(&self) -> CacheResult<()> {
        self.cache.to_cache_config().validate()?;

        if self.stress.threads == 0 {
            return Err(CacheError::invalid_config(
                "stress.threads",
                "must be greater than zero",
            ));
        }
        if self.stress.key_space == 0 {
            return Err(CacheError::invalid_config(
                "stress.key_space",
                "must be greater than zero",
            ));
        }
        // Worker key ranges plus the prefill range must fit the u64 key space.
        let key_total = self
            .stress
            .threads
            .checked_mul(self.stress.key_space)
            .and_then(|keys| keys.checked_add(self.cache.capacity))
            .filter(|&keys| u64::try_from(keys).is_ok());
        if key_total.is_none() {
            return Err(CacheError::invalid_config(
                "stress.key_space",
                format!(
                    "{} threads x {} keys overflows the key space",
                    self.stress.threads, self.stress.key_space
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.stress.read_ratio) {
            return Err(CacheError::invalid_config(
                "stress.read_ratio",
                format!("{} is outside 0.0..=1.0", self.stress.read_ratio),
            ));
        }
        Ok(())
    }
}
