//! Error types for the cache engines and services
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caches and the services built on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Index outside the backing array
    #[error("Index {index} out of bounds for array of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// Range whose left bound is past its right bound
    #[error("Invalid range: left bound {left} exceeds right bound {right}")]
    InvalidRange { left: usize, right: usize },

    /// Range sum does not fit in an i64
    #[error("Sum of range [{left}, {right}] overflows i64")]
    SumOverflow { left: usize, right: usize },

    /// Capacity of zero requested for a bounded cache
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal structure no longer holds its invariants
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
