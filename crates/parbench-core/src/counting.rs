//! Three ways to count even elements in parallel.
//!
//! - unsynchronized: shared counter, increment is a separate load and store,
//!   so concurrent increments get lost
//! - atomic: shared counter, `fetch_add` per element, always exact
//! - fork-join: no shared cell; per-worker local counts merged at the end
//!
//! Each counter is passed in by the caller so the discipline of every variant
//! is visible at the call site.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::error::BenchError;
use crate::strategy::WorkerPool;
use crate::utils;

/// Shared counter with a deliberately racy increment.
///
/// `increment` reads the value and writes back `value + 1` as two separate
/// operations. Two workers reading the same value both write the same result
/// and one update is lost. The cell itself is atomic, so the race is on the
/// read-modify-write sequence only and never undefined behavior.
#[derive(Debug, Default)]
pub struct RacyCounter {
    value: AtomicUsize,
}

impl RacyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        let current = self.value.load(Ordering::Relaxed);
        self.value.store(current + 1, Ordering::Relaxed);
    }

    pub fn get(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }
}

pub fn is_even(x: &u32) -> bool {
    x % 2 == 0
}

/// Reference count, single-threaded.
pub fn count_even_sequential(data: &[u32]) -> usize {
    data.iter().filter(|x| is_even(x)).count()
}

/// Count with racy increments. Returns the counter's value after the run; it
/// never exceeds the true count when the counter starts at zero.
pub fn count_unsynchronized(
    data: &[u32],
    counter: &RacyCounter,
    pool: &WorkerPool,
) -> Result<usize, BenchError> {
    pool.for_each("unsynchronized count", data, |x| {
        if is_even(x) {
            counter.increment();
        }
    })?;
    Ok(counter.get())
}

/// Count with one atomic increment per even element.
pub fn count_atomic(data: &[u32], counter: &AtomicUsize, pool: &WorkerPool) -> Result<usize, BenchError> {
    pool.for_each("atomic count", data, |x| {
        if is_even(x) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    })?;
    Ok(counter.load(Ordering::SeqCst))
}

/// Count with per-worker local totals merged by addition.
pub fn count_fork_join(data: &[u32], pool: &WorkerPool) -> Result<usize, BenchError> {
    pool.fork_join(
        "fork-join count",
        data,
        || 0usize,
        |local, x| local + usize::from(is_even(x)),
        |left, right| left + right,
    )
}

/// Result of one counting strategy. A worker failure is kept as a message so
/// the remaining strategies still run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyOutcome {
    Counted(usize),
    Failed(String),
}

impl StrategyOutcome {
    fn from_result(result: Result<usize, BenchError>) -> Self {
        match result {
            Ok(n) => StrategyOutcome::Counted(n),
            Err(e) => StrategyOutcome::Failed(e.to_string()),
        }
    }

    pub fn count(&self) -> Option<usize> {
        match self {
            StrategyOutcome::Counted(n) => Some(*n),
            StrategyOutcome::Failed(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountingReport {
    pub input_len: usize,
    pub expected: usize,
    pub unsynchronized: StrategyOutcome,
    pub atomic: StrategyOutcome,
    pub fork_join: StrategyOutcome,
}

impl CountingReport {
    /// Increments lost by the unsynchronized strategy.
    pub fn lost_updates(&self) -> Option<usize> {
        self.unsynchronized
            .count()
            .map(|n| self.expected.saturating_sub(n))
    }
}

/// Run all three strategies over `data` with fresh counters.
pub fn run_counting_demo(data: &[u32], pool: &WorkerPool) -> CountingReport {
    let expected = count_even_sequential(data);
    utils::log(&format!("Counting demo: {} even element(s) expected", expected));

    let racy = RacyCounter::new();
    let unsynchronized = StrategyOutcome::from_result(count_unsynchronized(data, &racy, pool));

    let shared = AtomicUsize::new(0);
    let atomic = StrategyOutcome::from_result(count_atomic(data, &shared, pool));

    let fork_join = StrategyOutcome::from_result(count_fork_join(data, pool));

    CountingReport {
        input_len: data.len(),
        expected,
        unsynchronized,
        atomic,
        fork_join,
    }
}
