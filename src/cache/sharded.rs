//! Sharded recency cache
//!
//! The key space is split by hash across independently locked
//! `BoundedRecencyCache` shards. Callers touching different shards never
//! contend.
//!
//! Recency is tracked **per shard**, not globally: a full shard evicts its own
//! least-recently-used entry even if another shard holds an older one. The
//! requested capacity is split across shards so that the shard capacities sum
//! to it exactly; total occupancy never exceeds `capacity`.
use super::config::CacheConfig;
use super::manager::{BoundedRecencyCache, CacheMetrics};
use crate::errors::{CacheError, CacheResult};
use crate::logger::{self, LogTag};
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

pub struct ShardedRecencyCache<K, V> {
    shards: Vec<BoundedRecencyCache<K, V>>,
    hasher: RandomState,
    capacity: usize,
}

impl<K, V> ShardedRecencyCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(capacity: usize, shards: usize) -> CacheResult<Self> {
        Self::with_config(&CacheConfig::sharded(capacity, shards))
    }

    pub fn with_config(config: &CacheConfig) -> CacheResult<Self> {
        config.validate()?;

        // validate() guarantees shards <= capacity, so every shard gets >= 1.
        let base = config.capacity / config.shards;
        let remainder = config.capacity % config.shards;
        let shards = (0..config.shards)
            .map(|i| BoundedRecencyCache::new(base + usize::from(i < remainder)))
            .collect::<CacheResult<Vec<_>>>()?;

        logger::verbose(
            LogTag::Cache,
            &format!(
                "Created sharded cache: {} entries over {} shards",
                config.capacity, config.shards
            ),
        );

        Ok(Self {
            shards,
            hasher: RandomState::new(),
            capacity: config.capacity,
        })
    }

    fn shard<Q>(&self, key: &Q) -> &BoundedRecencyCache<K, V>
    where
        Q: Hash + ?Sized,
    {
        let idx = (self.hasher.hash_one(key) as usize) % self.shards.len();
        &self.shards[idx]
    }

    /// Look up `key`, promoting it within its shard
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).get(key)
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).peek(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).contains(key)
    }

    pub fn put(&self, key: K, value: V) {
        self.shard(&key).put(key, value);
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).remove(key)
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.clear();
        }
    }

    /// Sum of shard sizes; shards are locked one at a time
    pub fn len(&self) -> usize {
        self.shards.iter().map(BoundedRecencyCache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(BoundedRecencyCache::is_empty)
    }

    /// Total capacity; equal to the sum of shard capacities
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Aggregated metrics across all shards
    pub fn metrics(&self) -> CacheMetrics {
        let mut total = CacheMetrics::default();
        for shard in &self.shards {
            total.merge(&shard.metrics());
        }
        total
    }

    pub fn reset_metrics(&self) {
        for shard in &self.shards {
            shard.reset_metrics();
        }
    }

    pub fn check_invariants(&self) -> CacheResult<()> {
        for (i, shard) in self.shards.iter().enumerate() {
            shard.check_invariants().map_err(|e| match e {
                CacheError::InvariantViolation { reason } => {
                    CacheError::invariant(format!("shard {}: {}", i, reason))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
