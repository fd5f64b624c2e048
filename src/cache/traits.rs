//! Cache Trait Module
//!
//! The seam the memoizing services use to talk to either cache engine.

use crate::cache::CacheStats;

// == Memo Cache ==
/// A key-value cache usable for memoization.
///
/// `lookup` may reorganize the cache (recency order, splaying), so it takes
/// `&mut self`. Absent keys are reported as `None`, never as a default value.
///
/// ```
/// use memo_cache::cache::{MemoCache, RecencyCache, SplayCache};
///
/// fn warm<C: MemoCache<u64, u128>>(cache: &mut C) {
///     for n in 0..10 {
///         cache.store(n, u128::from(n) * 2);
///     }
/// }
///
/// let mut lru = RecencyCache::new(16).unwrap();
/// let mut splay = SplayCache::new();
/// warm(&mut lru);
/// warm(&mut splay);
/// assert_eq!(lru.lookup(&4), splay.lookup(&4));
/// ```
pub trait MemoCache<K, V> {
    /// Returns a copy of the value stored under `key`, if any.
    fn lookup(&mut self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous value.
    fn store(&mut self, key: K, value: V);

    /// Returns the number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the cache's statistics.
    fn stats(&self) -> CacheStats;
}
