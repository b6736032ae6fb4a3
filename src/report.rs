//! Plain-text report lines. Styling is applied by the caller.

use parbench_core::utils::{format_count, format_secs};
use parbench_core::{BenchReport, CountingReport, Operation, StrategyOutcome};

pub fn size_header(size: usize) -> String {
    format!("=== Size: {} ===", format_count(size))
}

pub fn operation_header(operation: Operation) -> String {
    let letter = match operation {
        Operation::HeavyTransform => 'A',
        Operation::Primality => 'B',
    };
    format!("Operation {}: {}", letter, operation.description())
}

pub fn consistency_label(consistent: bool) -> &'static str {
    if consistent {
        "OK"
    } else {
        "Mismatch"
    }
}

pub fn benchmark_lines(r: &BenchReport) -> Vec<String> {
    vec![
        format!("Warmup {}... ({} element(s))", r.tag, format_count(r.warmup_len)),
        format!("Sequential: {}", format_secs(r.sequential.elapsed)),
        format!(
            "Parallel:   {} ({} workers, {:.2}x)",
            format_secs(r.parallel.elapsed),
            r.workers,
            r.speedup()
        ),
    ]
}

pub fn consistency_line(r: &BenchReport) -> String {
    format!("Consistency: {}", consistency_label(r.consistent))
}

/// One-line form used in quiet mode.
pub fn benchmark_summary(r: &BenchReport) -> String {
    format!(
        "{} n={}: seq {} | par {} | {:.2}x | {}",
        r.tag,
        format_count(r.input_len),
        format_secs(r.sequential.elapsed),
        format_secs(r.parallel.elapsed),
        r.speedup(),
        consistency_label(r.consistent)
    )
}

fn outcome_text(outcome: &StrategyOutcome) -> String {
    match outcome {
        StrategyOutcome::Counted(n) => n.to_string(),
        StrategyOutcome::Failed(msg) => format!("Error: {}", msg),
    }
}

pub fn counting_lines(r: &CountingReport) -> Vec<String> {
    let unsynchronized = match (&r.unsynchronized, r.lost_updates()) {
        (StrategyOutcome::Counted(n), Some(lost)) => format!(
            "Without sync: expected ~{}, actual: {} (lost {})",
            r.expected, n, lost
        ),
        (outcome, _) => format!("Without sync: {}", outcome_text(outcome)),
    };
    vec![
        unsynchronized,
        format!("Atomic: {}", outcome_text(&r.atomic)),
        format!("Fork-join: {}", outcome_text(&r.fork_join)),
    ]
}
