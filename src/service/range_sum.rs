//! Range Sum Service
//!
//! Answers inclusive sub-range sums over a mutable array, memoized in a
//! recency cache. Any array write drops every cached range.

use tracing::debug;

use crate::cache::{CacheKey, CacheStats, RecencyCache, RANGE_PREFIX};
use crate::error::{CacheError, Result};

// == Bounds Check ==
fn check_range(len: usize, left: usize, right: usize) -> Result<()> {
    if left >= len {
        return Err(CacheError::OutOfBounds { index: left, len });
    }
    if right >= len {
        return Err(CacheError::OutOfBounds { index: right, len });
    }
    if left > right {
        return Err(CacheError::InvalidRange { left, right });
    }
    Ok(())
}

// == Checked Sum ==
/// Sums `array[left..=right]`, failing instead of wrapping on overflow.
fn checked_sum(array: &[i64], left: usize, right: usize) -> Result<i64> {
    check_range(array.len(), left, right)?;
    array[left..=right]
        .iter()
        .try_fold(0i64, |acc, v| acc.checked_add(*v))
        .ok_or(CacheError::SumOverflow { left, right })
}

// == Uncached Baseline ==
/// Sums `array[left..=right]` directly.
pub fn range_sum_uncached(array: &[i64], left: usize, right: usize) -> Result<i64> {
    checked_sum(array, left, right)
}

/// Writes `value` at `index`.
pub fn update_uncached(array: &mut [i64], index: usize, value: i64) -> Result<()> {
    let len = array.len();
    let slot = array
        .get_mut(index)
        .ok_or(CacheError::OutOfBounds { index, len })?;
    *slot = value;
    Ok(())
}

// == Range Sum Service ==
/// Range-sum queries memoized under `range:{L}:{R}` keys.
///
/// Invalidation is coarse: an update to any index discards every cached
/// range, including ranges that do not cover the index.
#[derive(Debug)]
pub struct RangeSumService {
    cache: RecencyCache<CacheKey, i64>,
}

impl RangeSumService {
    // == Constructor ==
    pub fn new(cache: RecencyCache<CacheKey, i64>) -> Self {
        Self { cache }
    }

    /// Creates a service with a fresh cache of the given capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::new(RecencyCache::new(capacity)?))
    }

    // == Range Sum ==
    /// Returns the sum of `array[left..=right]`.
    ///
    /// # Errors
    /// `OutOfBounds` if either bound is past the end of `array`,
    /// `InvalidRange` if `left > right`, `SumOverflow` if the sum does not
    /// fit in an `i64`. Failed sums are not cached.
    pub fn range_sum(&mut self, array: &[i64], left: usize, right: usize) -> Result<i64> {
        check_range(array.len(), left, right)?;

        let key = CacheKey::range(left, right);
        if let Some(&sum) = self.cache.get(&key) {
            return Ok(sum);
        }

        let sum = checked_sum(array, left, right)?;
        self.cache.put(key, sum);
        Ok(sum)
    }

    // == Update ==
    /// Writes `value` at `index` and invalidates all cached ranges.
    pub fn update(&mut self, array: &mut [i64], index: usize, value: i64) -> Result<()> {
        update_uncached(array, index, value)?;
        let removed = self.cache.clear_keys_with_prefix(RANGE_PREFIX);
        debug!(index, removed, "array updated, range cache invalidated");
        Ok(())
    }

    pub fn cache(&self) -> &RecencyCache<CacheKey, i64> {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn into_cache(self) -> RecencyCache<CacheKey, i64> {
        self.cache
    }
}
