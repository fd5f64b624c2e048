//! Integration Tests for the public cache API
//!
//! Exercises both engines and both services through the library crate.

use num_bigint::BigUint;

use memo_cache::cache::{CacheKey, MemoCache, RecencyCache, SplayCache, RANGE_PREFIX};
use memo_cache::service::{fibonacci, FibonacciService, RangeSumService};
use memo_cache::CacheError;

// == Recency Cache ==

#[test]
fn test_recency_eviction_order() {
    let mut cache = RecencyCache::new(3).unwrap();

    for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
        cache.put(key, i);
    }

    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(&1));
    assert_eq!(cache.get(&"d"), Some(&3));
}

#[test]
fn test_recency_get_refreshes_entry() {
    let mut cache = RecencyCache::new(2).unwrap();

    cache.put("A", 1);
    cache.put("B", 2);
    cache.get(&"A");
    cache.put("C", 3);

    assert_eq!(cache.get(&"B"), None);
    assert_eq!(cache.get(&"A"), Some(&1));
    assert_eq!(cache.get(&"C"), Some(&3));
}

#[test]
fn test_prefix_invalidation_spares_other_namespaces() {
    let mut cache = RecencyCache::new(8).unwrap();
    cache.put(CacheKey::range(0, 2), 6i64);
    cache.put(CacheKey::range(1, 1), 2);
    cache.put(CacheKey::Fib(12), 144);

    assert_eq!(cache.clear_keys_with_prefix(RANGE_PREFIX), 2);

    assert_eq!(cache.get(&CacheKey::range(0, 2)), None);
    assert_eq!(cache.get(&CacheKey::range(1, 1)), None);
    assert_eq!(cache.get(&CacheKey::Fib(12)), Some(&144));
}

#[test]
fn test_recency_rejects_zero_capacity() {
    let result = RecencyCache::<u64, u128>::new(0);
    assert!(matches!(result, Err(CacheError::InvalidCapacity(_))));
}

// == Splay Cache ==

#[test]
fn test_splay_sorted_and_retrievable() {
    let mut tree = SplayCache::new();
    let keys = [41, 7, 93, 12, 66, 3, 58, 80, 25];

    for key in keys {
        tree.insert(key, key + 1);
        tree.check_invariants().unwrap();
    }
    for key in keys {
        assert_eq!(tree.search(&key), Some(&(key + 1)));
        assert_eq!(tree.root_key(), Some(&key));
    }

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    assert_eq!(tree.keys_in_order().into_iter().copied().collect::<Vec<_>>(), sorted);
}

#[test]
fn test_splay_idempotent_reinsert() {
    let mut tree = SplayCache::new();
    tree.insert(5, "v1");
    tree.insert(9, "x");
    tree.insert(5, "v2");

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.search(&5), Some(&"v2"));
}

#[test]
fn test_splay_miss_reports_absent() {
    let mut tree = SplayCache::new();
    tree.insert(0u32, 0u32);

    assert_eq!(tree.search(&1), None);
    assert_eq!(tree.search(&0), Some(&0));
}

// == Services ==

#[test]
fn test_fibonacci_cross_backend_equivalence() {
    let mut lru_service = FibonacciService::new(RecencyCache::new(64).unwrap());
    let mut splay_service = FibonacciService::new(SplayCache::new());

    for n in 0..=40 {
        assert_eq!(
            lru_service.fibonacci(n).unwrap(),
            splay_service.fibonacci(n).unwrap(),
            "n={n}"
        );
    }
    assert_eq!(
        splay_service.fibonacci(40).unwrap(),
        BigUint::from(102_334_155u32)
    );
}

#[test]
fn test_fibonacci_generic_over_backend() {
    fn run<C: MemoCache<CacheKey, BigUint>>(mut cache: C) -> BigUint {
        fibonacci(75, &mut cache).unwrap()
    }

    let expected = BigUint::from(2_111_485_077_978_050u64);
    assert_eq!(run(SplayCache::new()), expected);
    assert_eq!(run(RecencyCache::new(100).unwrap()), expected);
}

#[test]
fn test_range_sum_and_invalidation() {
    let mut array = vec![1, 2, 3, 4, 5];
    let mut service = RangeSumService::with_capacity(1000).unwrap();

    assert_eq!(service.range_sum(&array, 1, 3).unwrap(), 9);
    service.update(&mut array, 2, 100).unwrap();
    assert_eq!(service.range_sum(&array, 1, 3).unwrap(), 107);
}

#[test]
fn test_range_sum_typed_bounds_errors() {
    let mut array = vec![1, 2, 3];
    let mut service = RangeSumService::with_capacity(10).unwrap();

    assert_eq!(
        service.range_sum(&array, 0, 5),
        Err(CacheError::OutOfBounds { index: 5, len: 3 })
    );
    assert_eq!(
        service.update(&mut array, 9, 1),
        Err(CacheError::OutOfBounds { index: 9, len: 3 })
    );
}
