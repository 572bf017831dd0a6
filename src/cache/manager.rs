//! Bounded in-memory cache with LRU eviction
//!
//! Thread-safe, generic over key/value types. One mutex guards the key index,
//! the recency list and the metrics, so every call is a single critical
//! section and calls are linearizable in lock order.
//!
//! Tracks metrics for monitoring.
use super::config::CacheConfig;
use super::list::{Handle, RecencyList};
use crate::errors::{CacheError, CacheResult};
use crate::logger::{self, LogTag};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Cache metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
    pub removals: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fold another set of counters into this one
    pub fn merge(&mut self, other: &CacheMetrics) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.inserts += other.inserts;
        self.updates += other.updates;
        self.evictions += other.evictions;
        self.removals += other.removals;
    }
}

struct CacheState<K, V> {
    index: HashMap<K, Handle>,
    list: RecencyList<K, V>,
    metrics: CacheMetrics,
}

/// Fixed-capacity key/value store that evicts the least-recently-used entry
///
/// Share across threads by wrapping in `Arc`. Values are handed out as clones;
/// nothing outside the lock can reach the internal list or index.
pub struct BoundedRecencyCache<K, V> {
    capacity: usize,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> BoundedRecencyCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    ///
    /// Fails with a configuration error when `capacity` is zero.
    pub fn new(capacity: usize) -> CacheResult<Self> {
        if capacity == 0 {
            logger::debug(LogTag::Cache, "Rejected cache construction with capacity 0");
            return Err(CacheError::invalid_config(
                "capacity",
                "must be greater than zero",
            ));
        }

        logger::verbose(
            LogTag::Cache,
            &format!("Created recency cache with capacity {}", capacity),
        );

        Ok(Self {
            capacity,
            state: Mutex::new(CacheState {
                index: HashMap::with_capacity(capacity),
                list: RecencyList::with_capacity(capacity),
                metrics: CacheMetrics::default(),
            }),
        })
    }

    /// Create from configuration. Sharded configs belong to `ShardedRecencyCache`.
    pub fn with_config(config: &CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        if config.is_sharded() {
            return Err(CacheError::invalid_config(
                "shards",
                "a single-lock cache takes shards = 1; use ShardedRecencyCache",
            ));
        }
        Self::new(config.capacity)
    }

    /// Look up `key` and mark it most-recently-used
    ///
    /// A hit counts as a use: the entry moves to the front of the recency
    /// order and becomes the last candidate for eviction. A miss returns
    /// `None` and leaves the order untouched. Use [`peek`](Self::peek) for a
    /// read that does not promote.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        match state.index.get(key).copied() {
            Some(idx) => {
                state.list.move_to_front(idx);
                state.metrics.hits += 1;
                state.list.value(idx).cloned()
            }
            None => {
                state.metrics.misses += 1;
                None
            }
        }
    }

    /// Read without touching recency order or hit/miss counters
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let state = self.state.lock();
        let idx = *state.index.get(key)?;
        state.list.value(idx).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().index.contains_key(key)
    }

    /// Insert or update `key`, making it most-recently-used
    ///
    /// An existing key has its value replaced in place. A new key on a full
    /// cache first evicts the least-recently-used entry.
    pub fn put(&self, key: K, value: V) {
        let evicted = {
            let mut guard = self.state.lock();
            let state = &mut *guard;

            if let Some(&idx) = state.index.get(&key) {
                state.list.replace_value(idx, value);
                state.list.move_to_front(idx);
                state.metrics.updates += 1;
                None
            } else {
                let evicted = if state.list.len() >= self.capacity {
                    let victim = state.list.pop_back();
                    if let Some((old_key, _)) = &victim {
                        state.index.remove(old_key);
                        state.metrics.evictions += 1;
                    }
                    victim
                } else {
                    None
                };

                let idx = state.list.push_front(key.clone(), value);
                state.index.insert(key, idx);
                state.metrics.inserts += 1;
                evicted
            }
        };

        // Evicted entry is dropped here, after the lock is released.
        if evicted.is_some() && logger::is_debug_enabled_for_tag(&LogTag::Cache) {
            logger::debug(
                LogTag::Cache,
                &format!("Evicted least-recently-used entry (capacity {})", self.capacity),
            );
        }
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let idx = state.index.remove(key)?;
        let (_, value) = state.list.remove(idx)?;
        state.metrics.removals += 1;
        Some(value)
    }

    /// Clear all entries (metrics are kept)
    pub fn clear(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.index.clear();
        state.list.clear();
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.state.lock().list.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most- to least-recently-used, taken under the lock
    pub fn keys(&self) -> Vec<K> {
        self.state
            .lock()
            .list
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Get current metrics
    pub fn metrics(&self) -> CacheMetrics {
        self.state.lock().metrics.clone()
    }

    pub fn reset_metrics(&self) {
        self.state.lock().metrics = CacheMetrics::default();
    }

    /// Audit the structure under the lock
    ///
    /// Verifies the list and index agree in size, stay within capacity, link
    /// consistently in both directions and map every key to the slot holding
    /// that key.
    pub fn check_invariants(&self) -> CacheResult<()> {
        let state = self.state.lock();

        let len = state.list.len();
        if state.index.len() != len {
            return Err(CacheError::invariant(format!(
                "index has {} keys, list has {} entries",
                state.index.len(),
                len
            )));
        }
        if len > self.capacity {
            return Err(CacheError::invariant(format!(
                "{} entries exceed capacity {}",
                len, self.capacity
            )));
        }

        let forward = state.list.handles_forward();
        if forward.len() != len {
            return Err(CacheError::invariant(format!(
                "forward walk reached {} nodes, expected {}",
                forward.len(),
                len
            )));
        }
        let mut backward = state.list.handles_backward();
        backward.reverse();
        if backward != forward {
            return Err(CacheError::invariant("prev links disagree with next links"));
        }

        let mut seen = HashSet::with_capacity(len);
        for &idx in &forward {
            if !seen.insert(idx) {
                return Err(CacheError::invariant(format!(
                    "slot {} appears twice in recency order",
                    idx
                )));
            }
            let Some(key) = state.list.key(idx) else {
                return Err(CacheError::invariant(format!(
                    "slot {} is linked but empty",
                    idx
                )));
            };
            if state.index.get(key) != Some(&idx) {
                return Err(CacheError::invariant(format!(
                    "slot {} holds a key the index maps elsewhere",
                    idx
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn cache(capacity: usize) -> BoundedRecencyCache<String, String> {
        BoundedRecencyCache::new(capacity).unwrap()
    }

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn test_basic_operations() {
        let cache = cache(100);

        cache.put(s("key1"), s("value1"));
        assert_eq!(cache.get("key1"), Some(s("value1")));

        // Miss
        assert_eq!(cache.get("nonexistent"), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.inserts, 1);
        assert_eq!(metrics.hit_rate(), 0.5);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = BoundedRecencyCache::<u32, u32>::new(0);
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_capacity_invariant_over_puts() {
        let cache = BoundedRecencyCache::new(4).unwrap();
        for i in 0..10u32 {
            cache.put(i, i * 10);
            assert_eq!(cache.len(), std::cmp::min(i as usize + 1, 4));
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_capacity_invariant_with_repeated_keys() {
        let capacity = 4;
        let cache = BoundedRecencyCache::new(capacity).unwrap();
        let sequence = [1u32, 1, 2, 1, 3, 2, 2, 4, 1, 5, 5, 6, 3, 3, 7, 1, 8, 8, 2];
        let mut distinct = HashSet::new();

        for (step, &key) in sequence.iter().enumerate() {
            cache.put(key, step);
            distinct.insert(key);
            assert_eq!(cache.len(), std::cmp::min(distinct.len(), capacity));
            assert_eq!(cache.get(&key), Some(step));
            cache.check_invariants().unwrap();
        }

        let metrics = cache.metrics();
        assert_eq!(metrics.inserts + metrics.updates, sequence.len() as u64);
        assert_eq!(metrics.inserts - metrics.evictions, capacity as u64);
    }

    #[test]
    fn test_reset_metrics_keeps_entries() {
        let cache = cache(2);
        cache.put(s("A"), s("a"));
        cache.get("A");
        cache.get("missing");

        cache.reset_metrics();

        assert_eq!(cache.metrics(), CacheMetrics::default());
        assert_eq!(cache.peek("A"), Some(s("a")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = cache(3);
        cache.put(s("k1"), s("v1"));
        cache.put(s("k2"), s("v2"));
        cache.put(s("k3"), s("v3"));
        cache.put(s("k4"), s("v4")); // Should evict k1

        assert!(!cache.contains("k1"));
        for k in ["k2", "k3", "k4"] {
            assert!(cache.contains(k), "{} should be present", k);
        }
        assert_eq!(cache.metrics().evictions, 1);
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache = cache(3);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));
        cache.put(s("C"), s("c"));

        assert_eq!(cache.get("A"), Some(s("a")));
        cache.put(s("D"), s("d"));

        assert!(!cache.contains("B"));
        assert!(cache.contains("A"));
        assert!(cache.contains("C"));
        assert!(cache.contains("D"));
    }

    #[test]
    fn test_update_in_place() {
        let cache = cache(3);
        cache.put(s("A"), s("v1"));
        cache.put(s("B"), s("b"));
        cache.put(s("A"), s("v2"));

        assert_eq!(cache.get("A"), Some(s("v2")));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.metrics().updates, 1);
        assert_eq!(cache.keys(), vec![s("A"), s("B")]);
    }

    #[test]
    fn test_update_promotes_entry() {
        let cache = cache(2);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));
        cache.put(s("A"), s("a2"));
        cache.put(s("C"), s("c"));

        assert!(!cache.contains("B"));
        assert_eq!(cache.get("A"), Some(s("a2")));
    }

    #[test]
    fn test_miss_does_not_mutate() {
        let cache = cache(2);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));
        let before = cache.keys();

        assert_eq!(cache.get("missing"), None);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.keys(), before);
        assert_eq!(cache.metrics().evictions, 0);
    }

    #[test]
    fn test_repeated_get_is_idempotent() {
        let cache = cache(3);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));
        cache.put(s("C"), s("c"));

        cache.get("A");
        let order = cache.keys();
        for _ in 0..5 {
            cache.get("A");
            assert_eq!(cache.keys(), order);
        }

        cache.put(s("D"), s("d"));
        assert!(!cache.contains("B"));
    }

    #[test]
    fn test_capacity_two_scenario() {
        let cache = BoundedRecencyCache::new(2).unwrap();
        cache.put(1, s("a"));
        cache.put(2, s("b"));
        assert_eq!(cache.get(&1), Some(s("a")));
        cache.put(3, s("c"));

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(s("a")));
        assert_eq!(cache.get(&3), Some(s("c")));
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = cache(2);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));

        assert_eq!(cache.peek("A"), Some(s("a")));
        assert_eq!(cache.peek("missing"), None);
        cache.put(s("C"), s("c"));

        assert!(!cache.contains("A"));
        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 0);
        assert_eq!(metrics.misses, 0);
    }

    #[test]
    fn test_remove_and_slot_reuse() {
        let cache = cache(2);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));

        assert_eq!(cache.remove("A"), Some(s("a")));
        assert_eq!(cache.remove("A"), None);
        assert_eq!(cache.len(), 1);

        cache.put(s("C"), s("c"));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("B"));
        assert_eq!(cache.metrics().evictions, 0);
        assert_eq!(cache.metrics().removals, 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_clear() {
        let cache = cache(3);
        cache.put(s("A"), s("a"));
        cache.put(s("B"), s("b"));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get("A"), None);
        assert_eq!(cache.metrics().inserts, 2);
        cache.put(s("C"), s("c"));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_with_config() {
        type Cache = BoundedRecencyCache<u32, u32>;

        let cache = Cache::with_config(&CacheConfig::custom(8)).unwrap();
        assert_eq!(cache.capacity(), 8);

        assert!(Cache::with_config(&CacheConfig::custom(0)).is_err());
        assert!(Cache::with_config(&CacheConfig::sharded(8, 2)).is_err());
    }

    #[test]
    fn test_concurrent_disjoint_ranges() {
        let capacity = 64;
        let cache = Arc::new(BoundedRecencyCache::new(capacity).unwrap());
        let threads = 8;
        let per_thread = 2_000u64;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let base = t * 1_000_000;
                    for i in 0..per_thread {
                        let key = base + (i % 100);
                        cache.put(key, i);
                        if let Some(v) = cache.get(&key) {
                            assert!(v <= i);
                        }
                        if i % 250 == 0 {
                            cache.check_invariants().unwrap();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        cache.check_invariants().unwrap();
        assert_eq!(cache.len(), capacity);
        let keys = cache.keys();
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());

        let metrics = cache.metrics();
        assert_eq!(metrics.inserts + metrics.updates, threads * per_thread);
        assert_eq!(metrics.inserts - metrics.evictions, capacity as u64);
    }

    #[test]
    fn test_concurrent_full_cache_puts_all_evict() {
        let cache = Arc::new(BoundedRecencyCache::new(1).unwrap());
        cache.put(0u64, 0u64);

        let handles: Vec<_> = (1..=4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.put(t, t))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.metrics().evictions, 4);
        cache.check_invariants().unwrap();
    }
}
