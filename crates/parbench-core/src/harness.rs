//! Benchmark runner: time one pure function over the same input sequentially
//! and on a worker pool, then check that both paths produced the same number
//! of results.

use std::hint::black_box;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use crate::error::BenchError;
use crate::strategy::{ExecutionStrategy, WorkerPool};
use crate::utils;

/// Wall-clock time and output length of one timed path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    #[serde(rename = "elapsedSecs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub len: usize,
}

/// Outcome of one benchmark (one operation over one input).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchReport {
    pub tag: String,
    pub input_len: usize,
    pub warmup_len: usize,
    pub workers: usize,
    pub sequential: RunResult,
    pub parallel: RunResult,
    /// Both paths returned the same number of results
    pub consistent: bool,
}

impl BenchReport {
    /// Sequential time over parallel time; 0.0 when the parallel path took no
    /// measurable time.
    pub fn speedup(&self) -> f64 {
        let par = self.parallel.elapsed.as_secs_f64();
        if par == 0.0 {
            return 0.0;
        }
        self.sequential.elapsed.as_secs_f64() / par
    }
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Filter stage of the pipeline. Passes every element through.
pub fn pass_all<T>(_: &T) -> bool {
    true
}

/// Number of elements the untimed warm-up touches.
pub fn warmup_len(input_len: usize, limit: usize) -> usize {
    input_len.min(limit)
}

/// Run `op` over `data` once sequentially and once on `pool`, timing both.
///
/// The first `min(warmup_limit, data.len())` elements are mapped first and the
/// result discarded. A length mismatch between the paths is reported in
/// [`BenchReport::consistent`], not as an error; the only error is a worker
/// failure, surfaced as [`BenchError::Aggregate`].
pub fn run_benchmark<T, O, F>(
    data: &[T],
    op: F,
    tag: &str,
    pool: &WorkerPool,
    warmup_limit: usize,
) -> Result<BenchReport, BenchError>
where
    T: Sync,
    O: Send,
    F: Fn(&T) -> O + Sync + Send,
{
    let sequential_pool = ExecutionStrategy::Sequential.build()?;

    let warm = warmup_len(data.len(), warmup_limit);
    utils::log(&format!("{}: warm-up on {} element(s)", tag, warm));
    let warmed = sequential_pool.map(&format!("{} warm-up", tag), &data[..warm], pass_all, &op)?;
    let _ = black_box(warmed);

    let start = Instant::now();
    let seq = sequential_pool.map(&format!("{} sequential", tag), data, pass_all, &op)?;
    let seq_elapsed = start.elapsed();
    let seq_len = black_box(seq).len();
    utils::log(&format!("{}: sequential done in {}", tag, utils::format_secs(seq_elapsed)));

    let start = Instant::now();
    let par = pool.map(&format!("{} parallel", tag), data, pass_all, &op)?;
    let par_elapsed = start.elapsed();
    let par_len = black_box(par).len();
    utils::log(&format!(
        "{}: parallel done in {} on {} worker(s)",
        tag,
        utils::format_secs(par_elapsed),
        pool.workers()
    ));

    let consistent = seq_len == par_len;
    if !consistent {
        utils::log_error(&format!(
            "{}: result count mismatch (sequential {}, parallel {})",
            tag, seq_len, par_len
        ));
    }

    Ok(BenchReport {
        tag: tag.to_string(),
        input_len: data.len(),
        warmup_len: warm,
        workers: pool.workers(),
        sequential: RunResult {
            elapsed: seq_elapsed,
            len: seq_len,
        },
        parallel: RunResult {
            elapsed: par_elapsed,
            len: par_len,
        },
        consistent,
    })
}
