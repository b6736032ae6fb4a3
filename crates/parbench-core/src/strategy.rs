//! Execution strategies: run the same pipeline on the calling thread or on a
//! dedicated rayon pool.
//!
//! Every primitive on [`WorkerPool`] catches worker panics and returns them as
//! [`BenchError::Aggregate`], so callers see one error kind regardless of how
//! many tasks failed.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use crate::config::Config;
use crate::error::BenchError;
use crate::utils;

/// Minimum worker count when parallelism is forced.
pub const MIN_FORCED_WORKERS: usize = 2;

/// How a pipeline is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Single-threaded on the caller
    Sequential,
    /// Rayon pool with `workers` threads. With `force`, at least
    /// [`MIN_FORCED_WORKERS`] threads are used and input is split so every
    /// worker receives a share, however small the input.
    Parallel { workers: usize, force: bool },
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        Self::parallel()
    }
}

impl ExecutionStrategy {
    /// Forced parallel strategy sized to available CPUs.
    pub fn parallel() -> Self {
        ExecutionStrategy::Parallel {
            workers: num_cpus::get(),
            force: true,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        ExecutionStrategy::Parallel {
            workers: cfg.threads.unwrap_or_else(num_cpus::get),
            force: cfg.force_parallel,
        }
    }

    /// Set number of threads (no effect on `Sequential`)
    pub fn with_workers(self, n: usize) -> Self {
        match self {
            ExecutionStrategy::Parallel { force, .. } => {
                ExecutionStrategy::Parallel { workers: n, force }
            }
            s => s,
        }
    }

    pub fn with_force(self, force: bool) -> Self {
        match self {
            ExecutionStrategy::Parallel { workers, .. } => {
                ExecutionStrategy::Parallel { workers, force }
            }
            s => s,
        }
    }

    /// Thread count actually used.
    pub fn effective_workers(&self) -> usize {
        match *self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::Parallel { workers, force: true } => workers.max(MIN_FORCED_WORKERS),
            ExecutionStrategy::Parallel { workers, force: false } => workers.max(1),
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, ExecutionStrategy::Parallel { force: true, .. })
    }

    /// Build the pool for this strategy. Done once, outside any timed section.
    pub fn build(&self) -> Result<WorkerPool, BenchError> {
        let workers = self.effective_workers();
        let pool = match self {
            ExecutionStrategy::Sequential => None,
            ExecutionStrategy::Parallel { .. } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("parbench-worker-{}", i))
                    .build()
                    .map_err(|e| BenchError::Pool {
                        operation: "build".to_string(),
                        source: e.to_string(),
                    })?;
                utils::log(&format!(
                    "Worker pool ready: {} thread(s){}",
                    workers,
                    if self.is_forced() { ", forced" } else { "" }
                ));
                Some(pool)
            }
        };
        Ok(WorkerPool {
            pool,
            workers,
            force: self.is_forced(),
        })
    }
}

/// A built execution strategy. Holds the rayon pool for the parallel case.
pub struct WorkerPool {
    pool: Option<rayon::ThreadPool>,
    workers: usize,
    force: bool,
}

impl WorkerPool {
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Largest piece rayon may hand a single task. Forcing caps it at an even
    /// share so that every worker gets at least one piece.
    pub fn max_piece_len(&self, len: usize) -> usize {
        if self.force {
            len.div_ceil(self.workers).max(1)
        } else {
            usize::MAX
        }
    }

    /// Run `f` under this strategy, converting any worker panic into
    /// [`BenchError::Aggregate`].
    pub fn run<R, F>(&self, operation: &str, f: F) -> Result<R, BenchError>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        let result = match &self.pool {
            Some(pool) => panic::catch_unwind(AssertUnwindSafe(|| pool.install(f))),
            None => panic::catch_unwind(AssertUnwindSafe(f)),
        };
        result.map_err(|payload| {
            let err = BenchError::from_panic(operation, payload);
            utils::log_error(&format!("{}", err));
            err
        })
    }

    /// Filter then map every element. Sequential output keeps input order.
    pub fn map<T, O, P, F>(&self, operation: &str, data: &[T], keep: P, op: F) -> Result<Vec<O>, BenchError>
    where
        T: Sync,
        O: Send,
        P: Fn(&T) -> bool + Sync + Send,
        F: Fn(&T) -> O + Sync + Send,
    {
        if !self.is_parallel() {
            return self.run(operation, || data.iter().filter(|x| keep(*x)).map(|x| op(x)).collect());
        }
        let piece = self.max_piece_len(data.len());
        self.run(operation, || {
            data.par_iter()
                .with_max_len(piece)
                .filter(|x| keep(*x))
                .map(|x| op(x))
                .collect()
        })
    }

    /// Parallel for each
    pub fn for_each<T, F>(&self, operation: &str, data: &[T], f: F) -> Result<(), BenchError>
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        if !self.is_parallel() {
            return self.run(operation, || data.iter().for_each(|x| f(x)));
        }
        let piece = self.max_piece_len(data.len());
        self.run(operation, || data.par_iter().with_max_len(piece).for_each(|x| f(x)))
    }

    /// Fork-join reduction: each worker folds into a private accumulator
    /// created by `identity`, then partial results are merged with `combine`.
    /// `combine` must be associative and commutative with `identity()` as its
    /// neutral element.
    pub fn fork_join<T, A, I, F, C>(
        &self,
        operation: &str,
        data: &[T],
        identity: I,
        fold: F,
        combine: C,
    ) -> Result<A, BenchError>
    where
        T: Sync,
        A: Send,
        I: Fn() -> A + Sync + Send,
        F: Fn(A, &T) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send,
    {
        if !self.is_parallel() {
            return self.run(operation, || data.iter().fold(identity(), |acc, x| fold(acc, x)));
        }
        let piece = self.max_piece_len(data.len());
        self.run(operation, || {
            data.par_iter()
                .with_max_len(piece)
                .fold(|| identity(), |acc, x| fold(acc, x))
                .reduce(|| identity(), |a, b| combine(a, b))
        })
    }
}
