//! Optional config from .parbenchrc or ~/.parbenchrc (JSON). Merged with env and CLI.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

pub const RC_FILE: &str = ".parbenchrc";
pub const THREADS_ENV: &str = "PARBENCH_THREADS";
pub const SEED_ENV: &str = "PARBENCH_SEED";

pub const DEFAULT_SIZES: [usize; 3] = [1_000_000, 5_000_000, 10_000_000];
pub const DEFAULT_DEMO_SIZE: usize = 1_000_000;
pub const DEFAULT_SEED: u64 = 12345;
pub const DEFAULT_WARMUP_LIMIT: usize = 10_000;

/// Run configuration. File, env and CLI override the defaults in that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Input sizes benchmarked, in order
    pub sizes: Vec<usize>,
    /// Length of the list used by the counting demo
    pub demo_size: usize,
    /// RNG seed for data generation
    pub seed: u64,
    /// Parallel worker count; `None` means one per available CPU
    pub threads: Option<usize>,
    /// Force at least two workers and even splitting on the parallel path
    pub force_parallel: bool,
    /// Upper bound on the untimed warm-up pass
    pub warmup_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            demo_size: DEFAULT_DEMO_SIZE,
            seed: DEFAULT_SEED,
            threads: None,
            force_parallel: true,
            warmup_limit: DEFAULT_WARMUP_LIMIT,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.sizes.is_empty() {
            return Err(BenchError::config("sizes", "at least one input size is required"));
        }
        if self.sizes.iter().any(|&n| n == 0) {
            return Err(BenchError::config("sizes", "input sizes must be greater than zero"));
        }
        if self.demo_size == 0 {
            return Err(BenchError::config("demoSize", "demo size must be greater than zero"));
        }
        if self.threads == Some(0) {
            return Err(BenchError::config("threads", "thread count must be greater than zero"));
        }
        Ok(())
    }

    /// Apply `PARBENCH_THREADS` / `PARBENCH_SEED`. Unparsable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    /// Same as [`Config::apply_env`] with an explicit variable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(t) = lookup(THREADS_ENV).and_then(|v| v.trim().parse().ok()) {
            self.threads = Some(t);
        }
        if let Some(s) = lookup(SEED_ENV).and_then(|v| v.trim().parse().ok()) {
            self.seed = s;
        }
    }
}

/// Load config from .parbenchrc in dir, then ~/.parbenchrc. Missing or invalid file = default.
pub fn load_config(dir: &Path) -> Config {
    let mut candidates = vec![dir.join(RC_FILE)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(RC_FILE));
    }
    for path in &candidates {
        if path.is_file() {
            return read_config_file(path).unwrap_or_default();
        }
    }
    Config::default()
}

/// Parse a single rc file. Unknown keys are ignored; missing keys keep defaults.
pub fn read_config_file(path: &Path) -> Option<Config> {
    let s = std::fs::read_to_string(path).ok()?;
    serde_json::from_str::<Config>(&s).ok()
}
