//! The two CPU-bound transforms the suite benchmarks.

use serde::Serialize;

/// Rounds of the sqrt/ln mix applied by [`heavy_transform`].
const HEAVY_ROUNDS: usize = 8;

/// Numeric transform: eight rounds of `|sqrt(v + 1) * ln(v + 2)|`.
pub fn heavy_transform(x: u32) -> f64 {
    let mut v = f64::from(x);
    for _ in 0..HEAVY_ROUNDS {
        v = ((v + 1.0).sqrt() * (v + 2.0).ln()).abs();
    }
    v
}

/// Trial division by odd numbers up to `floor(sqrt(value))`.
pub fn is_probably_prime(value: u32) -> bool {
    if value < 2 {
        return false;
    }
    if value % 2 == 0 {
        return value == 2;
    }
    let limit = (value as f64).sqrt() as u32;
    let mut i = 3;
    while i <= limit {
        if value % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// The benchmarked operations, in suite order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Operation {
    HeavyTransform,
    Primality,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::HeavyTransform, Operation::Primality];

    pub fn tag(&self) -> &'static str {
        match self {
            Operation::HeavyTransform => "OpA",
            Operation::Primality => "OpB",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::HeavyTransform => "heavy transform",
            Operation::Primality => "primality test",
        }
    }
}
