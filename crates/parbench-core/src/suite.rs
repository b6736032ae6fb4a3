//! The full run: every configured size through both operations, then the
//! counting demo. Results are streamed to a callback as they complete.

use crate::config::Config;
use crate::counting::{run_counting_demo, CountingReport};
use crate::data::{generate_list, seeded_rng};
use crate::error::BenchError;
use crate::harness::{run_benchmark, BenchReport};
use crate::strategy::{ExecutionStrategy, WorkerPool};
use crate::transforms::{heavy_transform, is_probably_prime, Operation};

/// Progress of a suite run, in the order it happens.
#[derive(Debug)]
pub enum SuiteEvent {
    SizeStarted { size: usize },
    OperationStarted { size: usize, operation: Operation },
    Benchmark(BenchReport),
    /// A benchmark failed; the suite moves on to the next one
    BenchmarkFailed { operation: Operation, error: BenchError },
    CountingStarted { size: usize },
    Counting(CountingReport),
}

/// Benchmark one operation over `data`.
pub fn run_operation(
    operation: Operation,
    data: &[u32],
    pool: &WorkerPool,
    warmup_limit: usize,
) -> Result<BenchReport, BenchError> {
    match operation {
        Operation::HeavyTransform => {
            run_benchmark(data, |&x| heavy_transform(x), operation.tag(), pool, warmup_limit)
        }
        Operation::Primality => {
            run_benchmark(data, |&x| is_probably_prime(x), operation.tag(), pool, warmup_limit)
        }
    }
}

/// Run the whole suite. Only invalid configuration or a pool that cannot be
/// built end the run early; worker failures arrive as events and are already
/// logged by [`WorkerPool::run`].
pub fn run_suite<E>(cfg: &Config, mut on_event: E) -> Result<(), BenchError>
where
    E: FnMut(SuiteEvent),
{
    cfg.validate()?;
    let pool = ExecutionStrategy::from_config(cfg).build()?;
    let mut rng = seeded_rng(cfg.seed);

    for &size in &cfg.sizes {
        on_event(SuiteEvent::SizeStarted { size });
        let data = generate_list(size, &mut rng);

        for operation in Operation::ALL {
            on_event(SuiteEvent::OperationStarted { size, operation });
            match run_operation(operation, &data, &pool, cfg.warmup_limit) {
                Ok(report) => on_event(SuiteEvent::Benchmark(report)),
                Err(error) => on_event(SuiteEvent::BenchmarkFailed { operation, error }),
            }
        }
    }

    on_event(SuiteEvent::CountingStarted { size: cfg.demo_size });
    let demo = generate_list(cfg.demo_size, &mut rng);
    on_event(SuiteEvent::Counting(run_counting_demo(&demo, &pool)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        Config {
            sizes: vec![1_000, 3_000],
            demo_size: 2_000,
            threads: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_suite_event_order() {
        let mut events = Vec::new();
        run_suite(&small_config(), |e| events.push(e)).unwrap();

        // per size: SizeStarted + 2 x (OperationStarted + Benchmark); then demo
        assert_eq!(events.len(), 2 * 5 + 2);
        assert!(matches!(events[0], SuiteEvent::SizeStarted { size: 1_000 }));
        assert!(matches!(events[5], SuiteEvent::SizeStarted { size: 3_000 }));
        assert!(matches!(events[10], SuiteEvent::CountingStarted { size: 2_000 }));

        let reports: Vec<&BenchReport> = events
            .iter()
            .filter_map(|e| match e {
                SuiteEvent::Benchmark(r) => Some(r),
                _ => None,
            })
            .collect();
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].tag, "OpA");
        assert_eq!(reports[1].tag, "OpB");
        assert!(reports.iter().all(|r| r.consistent && r.workers == 2));
        assert_eq!(reports[3].parallel.len, 3_000);

        match events.last() {
            Some(SuiteEvent::Counting(report)) => {
                assert_eq!(report.input_len, 2_000);
                assert_eq!(report.atomic.count(), Some(report.expected));
                assert_eq!(report.fork_join.count(), Some(report.expected));
            }
            other => panic!("expected counting report, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_stops_before_running() {
        let cfg = Config {
            sizes: vec![0],
            ..small_config()
        };
        let mut called = false;
        let err = run_suite(&cfg, |_| called = true).unwrap_err();
        assert!(matches!(err, BenchError::Config { .. }));
        assert!(!called);
    }

    #[test]
    fn test_run_operation_dispatch() {
        let pool = ExecutionStrategy::parallel().build().unwrap();
        let data: Vec<u32> = (1..=100).collect();
        let a = run_operation(Operation::HeavyTransform, &data, &pool, 10).unwrap();
        let b = run_operation(Operation::Primality, &data, &pool, 10).unwrap();
        assert_eq!(a.tag, "OpA");
        assert_eq!(b.tag, "OpB");
        assert_eq!(a.warmup_len, 10);
        assert_eq!(b.parallel.len, 100);
    }
}
