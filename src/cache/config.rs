//! Cache configuration
//!
//! Capacities tuned for different use cases:
//! - Small: hot working sets (sessions, recently resolved lookups)
//! - Large: bulk memoisation where memory is cheap
//!
//! `shards > 1` selects the sharded variant, which trades global recency
//! ordering for less lock contention.
use crate::errors::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries (LRU eviction when exceeded)
    pub capacity: usize,

    /// Independently locked partitions of the key space
    pub shards: usize,
}

impl CacheConfig {
    /// Small hot working set
    pub fn small() -> Self {
        Self {
            capacity: 128,
            shards: 1,
        }
    }

    /// General purpose default
    pub fn standard() -> Self {
        Self {
            capacity: 1024,
            shards: 1,
        }
    }

    /// Large cache partitioned for many concurrent callers
    pub fn large_sharded() -> Self {
        Self {
            capacity: 65_536,
            shards: 16,
        }
    }

    /// Custom single-lock configuration
    pub fn custom(capacity: usize) -> Self {
        Self {
            capacity,
            shards: 1,
        }
    }

    /// Custom sharded configuration
    pub fn sharded(capacity: usize, shards: usize) -> Self {
        Self { capacity, shards }
    }

    /// Reject configurations that cannot produce a working cache
    pub fn validate(&self) -> CacheResult<()> {
        if self.capacity == 0 {
            return Err(CacheError::invalid_config(
                "capacity",
                "must be greater than zero",
            ));
        }
        if self.shards == 0 {
            return Err(CacheError::invalid_config(
                "shards",
                "must be greater than zero",
            ));
        }
        if self.shards > self.capacity {
            return Err(CacheError::invalid_config(
                "shards",
                format!(
                    "{} shards exceed capacity {}; every shard needs room for one entry",
                    self.shards, self.capacity
                ),
            ));
        }
        Ok(())
    }

    pub fn is_sharded(&self) -> bool {
        self.shards > 1
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::standard()
    }
}
