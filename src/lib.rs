//! Memo Cache - LRU and splay-tree caches for memoization
//!
//! Provides a fixed-capacity recency cache and a self-adjusting splay-tree
//! cache, plus range-sum and Fibonacci services that memoize through them.

pub mod bench;
pub mod cache;
pub mod config;
pub mod error;
pub mod service;

pub use cache::{CacheKey, CacheStats, MemoCache, RecencyCache, SplayCache};
pub use config::BenchConfig;
pub use error::{CacheError, Result};
pub use service::{fibonacci, FibonacciService, RangeSumService};
