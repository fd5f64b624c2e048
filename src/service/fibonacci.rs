//! Fibonacci Service
//!
//! Recursive Fibonacci memoized through any [`MemoCache`] backend, keyed by
//! `fib:{n}` and valued with arbitrary-precision integers.

use num_bigint::BigUint;

use crate::cache::{CacheKey, CacheStats, MemoCache};
use crate::error::{CacheError, Result};

/// Pending work while evaluating the recursion on an explicit stack.
#[derive(Debug, Clone, Copy)]
enum Task {
    /// Answer `fib(n)` from the base case or cache, or expand it
    Enter(u64),
    /// Both operands of `fib(n)` are on the value stack
    Combine(u64),
}

// == Fibonacci ==
/// Computes the `n`th Fibonacci number, consulting `cache` before each
/// recursive step and storing each computed value immediately.
///
/// Evaluation order matches the plain recursion `fib(n-1) + fib(n-2)`:
/// `fib(n-1)` finishes, storing everything below it, before `fib(n-2)` is
/// looked up. Indices 0 and 1 are answered directly and never stored. The
/// recursion runs on heap stacks, so large `n` cannot exhaust the call
/// stack.
pub fn fibonacci<C>(n: u64, cache: &mut C) -> Result<BigUint>
where
    C: MemoCache<CacheKey, BigUint>,
{
    let mut tasks = vec![Task::Enter(n)];
    let mut values: Vec<BigUint> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Enter(k) if k <= 1 => values.push(BigUint::from(k)),
            Task::Enter(k) => match cache.lookup(&CacheKey::Fib(k)) {
                Some(value) => values.push(value),
                None => {
                    tasks.push(Task::Combine(k));
                    tasks.push(Task::Enter(k - 2));
                    tasks.push(Task::Enter(k - 1));
                }
            },
            Task::Combine(k) => {
                let (Some(smaller), Some(larger)) = (values.pop(), values.pop()) else {
                    return Err(CacheError::Invariant(format!(
                        "missing operands for fibonacci({k})"
                    )));
                };
                let value = larger + smaller;
                cache.store(CacheKey::Fib(k), value.clone());
                values.push(value);
            }
        }
    }

    values
        .pop()
        .ok_or_else(|| CacheError::Invariant(format!("no result for fibonacci({n})")))
}

// == Fibonacci Service ==
/// Owns an injected cache and answers Fibonacci queries through it.
#[derive(Debug)]
pub struct FibonacciService<C> {
    cache: C,
}

impl<C> FibonacciService<C>
where
    C: MemoCache<CacheKey, BigUint>,
{
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    pub fn fibonacci(&mut self, n: u64) -> Result<BigUint> {
        fibonacci(n, &mut self.cache)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn into_cache(self) -> C {
        self.cache
    }
}
