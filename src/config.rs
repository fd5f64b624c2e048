//! Configuration Module
//!
//! Loads benchmark parameters from environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{CacheError, Result};

/// Benchmark configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Length of the generated integer array
    pub array_len: usize,
    /// Number of generated range/update queries
    pub query_count: usize,
    /// Capacity of the range-sum recency cache
    pub lru_capacity: usize,
    /// Largest Fibonacci index to time
    pub fib_max: u64,
    /// Step between timed Fibonacci indices
    pub fib_step: u64,
    /// Seed for the workload generator, random when unset
    pub seed: Option<u64>,
    /// Print the final report as JSON on stdout
    pub report_json: bool,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl BenchConfig {
    /// Creates a new BenchConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ARRAY_LEN` - Array length (default: 100000)
    /// - `QUERY_COUNT` - Number of queries (default: 50000)
    /// - `LRU_CAPACITY` - Range cache capacity (default: 1000)
    /// - `FIB_MAX` - Largest Fibonacci index (default: 950)
    /// - `FIB_STEP` - Fibonacci index step (default: 50)
    /// - `BENCH_SEED` - Workload seed (default: unset)
    /// - `REPORT_JSON` - Emit JSON report (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            array_len: env_or("ARRAY_LEN", defaults.array_len),
            query_count: env_or("QUERY_COUNT", defaults.query_count),
            lru_capacity: env_or("LRU_CAPACITY", defaults.lru_capacity),
            fib_max: env_or("FIB_MAX", defaults.fib_max),
            fib_step: env_or("FIB_STEP", defaults.fib_step),
            seed: env::var("BENCH_SEED").ok().and_then(|v| v.parse().ok()),
            report_json: env_or("REPORT_JSON", defaults.report_json),
        }
    }

    // == Validate ==
    /// Rejects values the benchmark cannot run with, logging the rejection.
    pub fn validate(&self) -> Result<()> {
        let checked = self.check();
        if let Err(err) = &checked {
            warn!(error = %err, "rejected benchmark configuration");
        }
        checked
    }

    fn check(&self) -> Result<()> {
        if self.lru_capacity == 0 {
            return Err(CacheError::InvalidCapacity(
                "LRU_CAPACITY must be greater than zero".to_string(),
            ));
        }
        if self.array_len == 0 {
            return Err(CacheError::InvalidConfig(
                "ARRAY_LEN must be greater than zero".to_string(),
            ));
        }
        if self.fib_step == 0 {
            return Err(CacheError::InvalidConfig(
                "FIB_STEP must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            array_len: 100_000,
            query_count: 50_000,
            lru_capacity: DEFAULT_CAPACITY,
            fib_max: 950,
            fib_step: 50,
            seed: None,
            report_json: false,
        }
    }
}
