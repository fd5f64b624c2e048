//! Memo Bench - times cached and uncached workloads
//!
//! Runs a random range-sum/update workload with and without the recency
//! cache, then times Fibonacci through both cache backends.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{bench, BenchConfig};

/// Entry point for the benchmark driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load and validate configuration from environment variables
/// 3. Run the range-sum workload, then the Fibonacci workload
/// 4. Log timings and optionally print the JSON report on stdout
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info,memo_bench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting memo cache benchmark");

    let config = BenchConfig::from_env();
    config
        .validate()
        .context("invalid benchmark configuration")?;
    info!(
        "Configuration loaded: array_len={}, query_count={}, lru_capacity={}, fib_max={}, fib_step={}, seed={:?}",
        config.array_len,
        config.query_count,
        config.lru_capacity,
        config.fib_max,
        config.fib_step,
        config.seed
    );

    let report = bench::run(&config).context("benchmark run failed")?;

    info!(
        "Range sums: {:.2}s without cache, {:.2}s with LRU cache (hit rate {:.1}%)",
        report.range.uncached_secs,
        report.range.cached_secs,
        report.range.cache.hit_rate() * 100.0
    );
    info!("{:<10}{:<20}{:<20}", "n", "LRU time (s)", "Splay time (s)");
    for timing in &report.fibonacci {
        info!(
            "{:<10}{:<20.8}{:<20.8}",
            timing.n, timing.lru_secs, timing.splay_secs
        );
    }

    if config.report_json {
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{json}");
    }

    info!("Benchmark complete");
    Ok(())
}
