//! Input generation for the suite.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MIN_VALUE: u32 = 1;
pub const MAX_VALUE: u32 = 1_000_000;

/// Reproducible RNG for a given seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `n` values drawn uniformly from `[1, 1_000_000]`.
pub fn generate_list<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u32> {
    (0..n).map(|_| rng.gen_range(MIN_VALUE..=MAX_VALUE)).collect()
}
