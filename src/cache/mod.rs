//! Cache Module
//!
//! Two interchangeable cache engines: a fixed-capacity LRU cache and an
//! unbounded splay-tree cache.

mod key;
mod lru;
mod recency;
mod splay;
mod stats;
mod traits;


// Re-export public types
pub use key::{CacheKey, FIB_PREFIX, RANGE_PREFIX};
pub use lru::RecencyOrder;
pub use recency::RecencyCache;
pub use splay::SplayCache;
pub use stats::CacheStats;
pub use traits::MemoCache;

// == Public Constants ==
/// Capacity of the recency cache when none is configured
pub const DEFAULT_CAPACITY: usize = 1000;
