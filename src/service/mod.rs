//! Service Module
//!
//! Memoizing computations built on the cache engines. Caches are passed in
//! by the caller; no service owns a process-wide instance.

mod fibonacci;
mod range_sum;

pub use fibonacci::{fibonacci, FibonacciService};
pub use range_sum::{range_sum_uncached, update_uncached, RangeSumService};
