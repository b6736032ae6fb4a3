use std::env;
use std::time::Duration;

use chrono::Local;

pub const QUIET_ENV: &str = "PARBENCH_QUIET";
pub const LOG_ENV: &str = "PARBENCH_LOG";

fn is_quiet() -> bool {
    if env::var(QUIET_ENV).map(|v| v == "1" || v == "true").unwrap_or(false) {
        return true;
    }
    env::var(LOG_ENV)
        .map(|v| v.to_lowercase() == "quiet" || v.to_lowercase() == "error")
        .unwrap_or(false)
}

fn stamp(message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] {}", timestamp, message)
}

/// Timestamped diagnostic line on stderr; stdout is reserved for the report.
pub fn log(message: &str) {
    if !is_quiet() {
        eprintln!("{}", stamp(message));
    }
}

/// Errors are printed even in quiet mode.
pub fn log_error(message: &str) {
    eprintln!("{}", stamp(message));
}

/// Seconds with millisecond precision, e.g. `1.234 s`.
pub fn format_secs(d: Duration) -> String {
    format!("{:.3} s", d.as_secs_f64())
}

/// Thousands-separated count, e.g. `10,000,000`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
