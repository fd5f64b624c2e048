//! Cache Key Module
//!
//! Namespaced keys shared by the memoizing services.

use std::fmt;

// == Namespace Prefixes ==
/// Textual prefix of every range-sum key.
pub const RANGE_PREFIX: &str = "range:";

/// Textual prefix of every Fibonacci key.
pub const FIB_PREFIX: &str = "fib:";

// == Cache Key ==
/// Composite key tagging the cached operation with its arguments.
///
/// The `Display` form (`range:{L}:{R}`, `fib:{n}`) is what prefix
/// invalidation matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    /// Inclusive range `[left, right]` of a range-sum query
    Range { left: usize, right: usize },
    /// Index of a Fibonacci number
    Fib(u64),
}

impl CacheKey {
    pub fn range(left: usize, right: usize) -> Self {
        CacheKey::Range { left, right }
    }

    /// Returns true if this key's textual form starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.to_string().starts_with(prefix)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Range { left, right } => write!(f, "{RANGE_PREFIX}{left}:{right}"),
            CacheKey::Fib(n) => write!(f, "{FIB_PREFIX}{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(CacheKey::range(1, 3).to_string(), "range:1:3");
        assert_eq!(CacheKey::Fib(40).to_string(), "fib:40");
    }

    #[test]
    fn test_key_prefix() {
        assert!(CacheKey::range(0, 0).has_prefix(RANGE_PREFIX));
        assert!(CacheKey::range(12, 30).has_prefix("range:12"));
        assert!(!CacheKey::Fib(3).has_prefix(RANGE_PREFIX));
        assert!(CacheKey::Fib(3).has_prefix(FIB_PREFIX));
    }
}
