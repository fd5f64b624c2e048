//! Recency Cache Module
//!
//! Fixed-capacity cache combining HashMap storage with LRU ordering.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use tracing::debug;

use crate::cache::{CacheStats, MemoCache, RecencyOrder};
use crate::error::{CacheError, Result};

// == Recency Cache ==
/// Key-value cache that evicts the least recently used entry on overflow.
///
/// Every key in `entries` appears exactly once in `order` and vice versa.
#[derive(Debug)]
pub struct RecencyCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, V>,
    /// LRU access order
    order: RecencyOrder<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> RecencyCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(
                "capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            order: RecencyOrder::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// A miss leaves the recency order untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains_key(key) {
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.order.touch(key);
        self.entries.get(key)
    }

    // == Put ==
    /// Stores a key-value pair as the most recently used entry.
    ///
    /// Overwriting an existing key never evicts. Inserting a new key into a
    /// full cache evicts the least recently used entry first and returns it.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            self.order.touch(&key);
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.evict_oldest() {
                if let Some(old_value) = self.entries.remove(&oldest) {
                    self.stats.record_eviction();
                    debug!(capacity = self.capacity, "evicted least recently used entry");
                    evicted = Some((oldest, old_value));
                }
            }
        }

        self.order.push(key.clone());
        self.entries.insert(key, value);
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency or statistics.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the key that the next overflow would evict.
    pub fn peek_lru(&self) -> Option<&K> {
        self.order.peek_oldest()
    }

    /// Iterates keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    // == Clear ==
    /// Drops every entry. Counted as invalidations.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(0);
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Check Invariants ==
    /// Verifies the map/order bijection and the capacity bound.
    pub fn check_invariants(&self) -> Result<()> {
        if self.entries.len() > self.capacity {
            return Err(CacheError::Invariant(format!(
                "{} entries exceed capacity {}",
                self.entries.len(),
                self.capacity
            )));
        }
        if self.order.len() != self.entries.len() {
            return Err(CacheError::Invariant(format!(
                "order tracks {} keys but map holds {}",
                self.order.len(),
                self.entries.len()
            )));
        }
        // Equal lengths plus full coverage rules out duplicates in the order.
        if self.entries.keys().any(|key| !self.order.contains(key)) {
            return Err(CacheError::Invariant(
                "stored key missing from recency order".to_string(),
            ));
        }
        Ok(())
    }
}

impl<K, V> RecencyCache<K, V>
where
    K: Hash + Eq + Clone + Display,
{
    // == Clear Keys With Prefix ==
    /// Removes every key whose textual form starts with `prefix`.
    ///
    /// Remaining keys keep their relative recency. Returns the number of
    /// entries removed.
    pub fn clear_keys_with_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, _| !key.to_string().starts_with(prefix));

        let removed = before - self.entries.len();
        if removed > 0 {
            let entries = &self.entries;
            self.order.retain(|key| entries.contains_key(key));
            self.stats.record_invalidations(removed);
            self.stats.set_total_entries(self.entries.len());
            debug!(prefix, removed, "cleared cached entries by prefix");
        }

        removed
    }
}

impl<K, V> MemoCache<K, V> for RecencyCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.put(key, value);
    }

    fn len(&self) -> usize {
        RecencyCache::len(self)
    }

    fn stats(&self) -> CacheStats {
        RecencyCache::stats(self)
    }
}
