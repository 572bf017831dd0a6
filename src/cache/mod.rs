//! Bounded recency cache
//!
//! - [`BoundedRecencyCache`]: single-lock LRU cache with O(1) `get`/`put`
//! - [`ShardedRecencyCache`]: opt-in hash-sharded variant (per-shard recency)
//! - [`CacheConfig`]: capacity/shard settings with presets and validation

pub mod config;
pub mod list;
pub mod manager;
pub mod sharded;

// Re-export public interfaces
pub use config::CacheConfig;
pub use list::{Handle, RecencyList};
pub use manager::{BoundedRecencyCache, CacheMetrics};
pub use sharded::ShardedRecencyCache;
