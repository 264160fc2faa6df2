//! Random number generator abstraction for determinism.
//!
//! Word selection and occurrence choice both draw from this trait. In
//! production it wraps a real RNG; tests inject a seeded or scripted one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Flip a fair coin. `true` is heads.
    fn coin_flip(&mut self) -> bool {
        self.next_u32_range(0, 1) == 0
    }
}

/// Production RNG backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct StdDeterministicRng {
    inner: StdRng,
}

impl StdDeterministicRng {
    /// Seeds from the operating system's entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Seeds from a fixed value, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl DeterministicRng for StdDeterministicRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..=max)
    }
}
