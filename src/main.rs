//! Thin CLI layer: parse args, styled output, and call into parbench-core.
//! Crash-proof: panic caught and reported; all errors return Result.

mod report;

use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parbench_core::{Config, SuiteEvent};
use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

// ---- UI helpers (no-op when stdout isn't a TTY) ----

fn use_color() -> bool {
    std::io::stdout().is_terminal()
        && env::var("NO_COLOR").unwrap_or_default().is_empty()
}

fn success(msg: &str) {
    if use_color() {
        println!("{}", msg.green());
    } else {
        println!("{}", msg);
    }
}

fn error(msg: &str) {
    if use_color() {
        eprintln!("{}", msg.red());
    } else {
        eprintln!("{}", msg);
    }
}

fn warning(msg: &str) {
    if use_color() {
        println!("{}", msg.yellow());
    } else {
        println!("{}", msg);
    }
}

fn info(msg: &str) {
    if use_color() {
        println!("{}", msg.cyan());
    } else {
        println!("{}", msg);
    }
}

fn dim(msg: &str) {
    if use_color() {
        println!("{}", msg.dimmed());
    } else {
        println!("{}", msg);
    }
}

/// How suite events are rendered.
#[derive(Clone, Copy)]
struct Output {
    quiet: bool,
    json: bool,
}

fn print_event(event: SuiteEvent, out: Output, spinner: Option<&ProgressBar>) {
    if out.json {
        let value = match &event {
            SuiteEvent::Benchmark(r) => serde_json::json!({ "kind": "benchmark", "report": r }),
            SuiteEvent::Counting(r) => serde_json::json!({ "kind": "counting", "report": r }),
            SuiteEvent::BenchmarkFailed { operation, error } => serde_json::json!({
                "kind": "error",
                "operation": operation.tag(),
                "message": error.to_string(),
            }),
            _ => return,
        };
        println!("{}", value);
        return;
    }

    if out.quiet {
        let line = match &event {
            SuiteEvent::OperationStarted { size, operation } => {
                if let Some(s) = spinner {
                    s.set_message(format!(
                        "{} on {} elements",
                        operation.tag(),
                        parbench_core::format_count(*size)
                    ));
                }
                return;
            }
            SuiteEvent::CountingStarted { .. } => {
                if let Some(s) = spinner {
                    s.set_message("Counting demo");
                }
                return;
            }
            SuiteEvent::Benchmark(r) => report::benchmark_summary(r),
            SuiteEvent::BenchmarkFailed { operation, error } => {
                format!("{}: Error: {}", operation.tag(), error)
            }
            SuiteEvent::Counting(r) => report::counting_lines(r).join(" | "),
            SuiteEvent::SizeStarted { .. } => return,
        };
        match spinner {
            Some(s) => s.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
        return;
    }

    match event {
        SuiteEvent::SizeStarted { size } => info(&report::size_header(size)),
        SuiteEvent::OperationStarted { operation, .. } => {
            println!("{}", report::operation_header(operation))
        }
        SuiteEvent::Benchmark(r) => {
            for line in report::benchmark_lines(&r) {
                println!("{}", line);
            }
            if r.consistent {
                success(&report::consistency_line(&r));
            } else {
                warning(&report::consistency_line(&r));
            }
            println!();
        }
        SuiteEvent::BenchmarkFailed { error: e, .. } => {
            error(&format!("Error: {}", e));
            println!();
        }
        SuiteEvent::CountingStarted { size } => {
            info("=== Parallel Side Effects Demo ===");
            dim(&format!("{} elements", parbench_core::format_count(size)));
        }
        SuiteEvent::Counting(r) => {
            for line in report::counting_lines(&r) {
                println!("{}", line);
            }
            println!();
        }
    }
}

/// Run the suite on a background thread; in quiet mode show a spinner until done.
fn run_suite_with_output(cfg: Config, out: Output) -> Result<(), String> {
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        parbench_core::run_suite(&cfg, |event| {
            let _ = tx.send(event);
        })
    });

    let spinner = if out.quiet && !out.json {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠁⠂⠄⠈⠐⠠⠰⠸⠹")
                .template("{spinner:.dim} {msg}")
                .map_err(|e| e.to_string())?,
        );
        spinner.set_message("Generating data");
        Some(spinner)
    } else {
        None
    };

    let tick = Duration::from_millis(80);
    loop {
        match rx.recv_timeout(tick) {
            Ok(event) => print_event(event, out, spinner.as_ref()),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(s) = &spinner {
                    s.tick();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match worker.join() {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("Benchmark thread failed unexpectedly.".to_string()),
    }
}

/// Block until Enter is pressed. Skipped when stdin is not interactive.
fn wait_for_key() {
    if !io::stdin().is_terminal() {
        return;
    }
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn build_cli() -> Command {
    Command::new("parbench")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sequential vs data-parallel benchmark, plus a shared-counter race demo")
        .after_help(
            "Examples:\n  parbench\n  parbench --sizes 100000 500000 --threads 4\n  parbench --json --no-wait",
        )
        .arg(
            Arg::new("sizes")
                .long("sizes")
                .num_args(1..)
                .value_parser(clap::value_parser!(usize))
                .help("Input sizes to benchmark (default: 1000000 5000000 10000000)"),
        )
        .arg(
            Arg::new("demo-size")
                .long("demo-size")
                .value_parser(clap::value_parser!(usize))
                .help("Number of elements in the counting demo (default: 1000000)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(clap::value_parser!(u64))
                .help("Seed for data generation (or set PARBENCH_SEED)"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(clap::value_parser!(usize))
                .help("Parallel worker count (default: available CPUs; or set PARBENCH_THREADS)"),
        )
        .arg(
            Arg::new("no-force")
                .long("no-force")
                .action(ArgAction::SetTrue)
                .help("Do not force at least two workers and even splitting"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Output one JSON object per result"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Minimal output; show spinner when busy"),
        )
        .arg(
            Arg::new("no-wait")
                .long("no-wait")
                .action(ArgAction::SetTrue)
                .help("Exit without waiting for a key press"),
        )
}

fn run() -> Result<(), String> {
    let matches = build_cli().get_matches();

    let quiet = matches.get_flag("quiet");
    let json = matches.get_flag("json");
    if quiet {
        env::set_var(parbench_core::utils::QUIET_ENV, "1");
    }

    let cwd = env::current_dir().map_err(|e| e.to_string())?;
    let mut cfg = parbench_core::load_config(&cwd);
    cfg.apply_env();
    if let Some(sizes) = matches.get_many::<usize>("sizes") {
        cfg.sizes = sizes.copied().collect();
    }
    if let Some(&n) = matches.get_one::<usize>("demo-size") {
        cfg.demo_size = n;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        cfg.seed = seed;
    }
    if let Some(&t) = matches.get_one::<usize>("threads") {
        cfg.threads = Some(t);
    }
    if matches.get_flag("no-force") {
        cfg.force_parallel = false;
    }
    cfg.validate().map_err(|e| e.to_string())?;

    if !json && !quiet {
        if use_color() {
            println!("{}", "parbench".bright_cyan().bold());
        } else {
            println!("parbench");
        }
        dim("Sequential vs parallel benchmark\n");
    }

    run_suite_with_output(cfg, Output { quiet, json })?;

    if !json {
        success("Done.");
    }
    if !matches.get_flag("no-wait") {
        wait_for_key();
    }
    Ok(())
}

fn main() {
    if !use_color() {
        colored::control::set_override(false);
    }

    let code = match std::panic::catch_unwind(run) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error(&e);
            1
        }
        Err(_) => {
            error("An unexpected error occurred. Please report this issue.");
            1
        }
    };
    std::process::exit(code);
}
