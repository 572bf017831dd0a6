//! Bounded, thread-safe least-recently-used cache
//!
//! ```rust
//! use recency_cache::BoundedRecencyCache;
//!
//! let cache = BoundedRecencyCache::new(2).unwrap();
//! cache.put(1, "a");
//! cache.put(2, "b");
//! assert_eq!(cache.get(&1), Some("a")); // promotes 1
//! cache.put(3, "c"); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! ```

pub mod arguments;
pub mod cache;
pub mod config;
pub mod errors;
pub mod logger;

pub use cache::{BoundedRecencyCache, CacheConfig, CacheMetrics, ShardedRecencyCache};
pub use errors::{CacheError, CacheResult, ConfigurationError};
