//! Core library for parbench: execution strategies, benchmark runner, counting
//! strategies, config and logging. Used by the CLI binary.

pub mod config;
pub mod counting;
pub mod data;
pub mod error;
pub mod harness;
pub mod strategy;
pub mod suite;
pub mod transforms;
pub mod utils;

// Re-export main API for CLI
pub use config::{load_config, Config};
pub use counting::{
    count_atomic, count_even_sequential, count_fork_join, count_unsynchronized,
    run_counting_demo, CountingReport, RacyCounter, StrategyOutcome,
};
pub use error::BenchError;
pub use harness::{run_benchmark, BenchReport, RunResult};
pub use strategy::{ExecutionStrategy, WorkerPool};
pub use suite::{run_suite, SuiteEvent};
pub use transforms::{heavy_transform, is_probably_prime, Operation};
pub use utils::{format_count, format_secs, log, log_error};
