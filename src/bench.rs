//! Benchmark Module
//!
//! Generates random workloads and times them with and without caching.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use num_bigint::BigUint;

use crate::cache::{CacheKey, CacheStats, RecencyCache, SplayCache};
use crate::config::BenchConfig;
use crate::error::{CacheError, Result};
use crate::service::{fibonacci, range_sum_uncached, update_uncached, RangeSumService};

// == Query ==
/// One operation of the range-sum workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Sum of `array[left..=right]`
    Range { left: usize, right: usize },
    /// Write `value` at `index`
    Update { index: usize, value: i64 },
}

// == Reports ==
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub uncached_secs: f64,
    pub cached_secs: f64,
    /// Sum of every range answer; identical for both runs
    pub checksum: i64,
    pub cache: CacheStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct FibTiming {
    pub n: u64,
    /// Decimal digits of `fibonacci(n)`
    pub value: String,
    pub lru_secs: f64,
    pub splay_secs: f64,
    pub splay_rotations: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub seed: Option<u64>,
    pub range: RangeReport,
    pub fibonacci: Vec<FibTiming>,
}

// == Workload Generation ==
/// Generates `len` values in `1..=1000`.
pub fn generate_array<R: Rng>(rng: &mut R, len: usize) -> Vec<i64> {
    (0..len).map(|_| rng.gen_range(1..=1000)).collect()
}

/// Generates an even mix of range and update queries against an array of
/// length `len`. Range bounds are ordered so `left <= right`.
pub fn generate_queries<R: Rng>(rng: &mut R, len: usize, count: usize) -> Vec<Query> {
    (0..count)
        .map(|_| {
            if rng.gen_bool(0.5) {
                let a = rng.gen_range(0..len);
                let b = rng.gen_range(0..len);
                Query::Range {
                    left: a.min(b),
                    right: a.max(b),
                }
            } else {
                Query::Update {
                    index: rng.gen_range(0..len),
                    value: rng.gen_range(1..=1000),
                }
            }
        })
        .collect()
}

// == Query Runners ==
/// Runs `queries` with no caching. Returns the range-answer checksum.
pub fn run_uncached(array: &mut [i64], queries: &[Query]) -> Result<i64> {
    let mut checksum = 0i64;
    for query in queries {
        match *query {
            Query::Range { left, right } => {
                checksum = checksum.wrapping_add(range_sum_uncached(array, left, right)?);
            }
            Query::Update { index, value } => update_uncached(array, index, value)?,
        }
    }
    Ok(checksum)
}

/// Runs `queries` through `service`. Returns the range-answer checksum.
pub fn run_cached(
    service: &mut RangeSumService,
    array: &mut [i64],
    queries: &[Query],
) -> Result<i64> {
    let mut checksum = 0i64;
    for query in queries {
        match *query {
            Query::Range { left, right } => {
                checksum = checksum.wrapping_add(service.range_sum(array, left, right)?);
            }
            Query::Update { index, value } => service.update(array, index, value)?,
        }
    }
    Ok(checksum)
}

// == Range Benchmark ==
pub fn bench_range(
    array: &[i64],
    queries: &[Query],
    capacity: usize,
) -> Result<RangeReport> {
    let mut plain = array.to_vec();
    let start = Instant::now();
    let plain_checksum = run_uncached(&mut plain, queries)?;
    let uncached_secs = start.elapsed().as_secs_f64();

    let mut cached = array.to_vec();
    let mut service = RangeSumService::with_capacity(capacity)?;
    let start = Instant::now();
    let cached_checksum = run_cached(&mut service, &mut cached, queries)?;
    let cached_secs = start.elapsed().as_secs_f64();

    if plain_checksum != cached_checksum {
        warn!(plain_checksum, cached_checksum, "cached range sums diverged");
        return Err(CacheError::Invariant(
            "cached and uncached range sums differ".to_string(),
        ));
    }

    Ok(RangeReport {
        uncached_secs,
        cached_secs,
        checksum: cached_checksum,
        cache: service.stats(),
    })
}

// == Fibonacci Benchmark ==
/// Times Fibonacci for `0, step, ..., max` with a fresh cache of each kind
/// per index.
pub fn bench_fibonacci(max: u64, step: u64) -> Result<Vec<FibTiming>> {
    if step == 0 {
        return Err(CacheError::InvalidConfig(
            "Fibonacci step must be greater than zero".to_string(),
        ));
    }

    // Room for every memoized index keeps the LRU from thrashing.
    let lru_capacity = usize::try_from(max).unwrap_or(usize::MAX).max(3);
    let mut timings = Vec::new();

    for n in (0..=max).step_by(step as usize) {
        let mut lru: RecencyCache<CacheKey, BigUint> = RecencyCache::new(lru_capacity)?;
        let start = Instant::now();
        let from_lru = fibonacci(n, &mut lru)?;
        let lru_secs = start.elapsed().as_secs_f64();

        let mut splay = SplayCache::new();
        let start = Instant::now();
        let from_splay = fibonacci(n, &mut splay)?;
        let splay_secs = start.elapsed().as_secs_f64();

        if from_lru != from_splay {
            return Err(CacheError::Invariant(format!(
                "cache backends disagree on fibonacci({n})"
            )));
        }

        debug!(n, lru_secs, splay_secs, "timed fibonacci");
        timings.push(FibTiming {
            n,
            value: from_splay.to_string(),
            lru_secs,
            splay_secs,
            splay_rotations: splay.rotations(),
        });
    }

    Ok(timings)
}

// == Run ==
/// Runs the full benchmark described by `config`.
pub fn run(config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let array = generate_array(&mut rng, config.array_len);
    let queries = generate_queries(&mut rng, config.array_len, config.query_count);
    info!(
        array_len = config.array_len,
        queries = queries.len(),
        "running range-sum workload"
    );
    let range = bench_range(&array, &queries, config.lru_capacity)?;

    info!(
        fib_max = config.fib_max,
        fib_step = config.fib_step,
        "running fibonacci workload"
    );
    let fibonacci = bench_fibonacci(config.fib_max, config.fib_step)?;

    Ok(BenchReport {
        seed: config.seed,
        range,
        fibonacci,
    })
}
