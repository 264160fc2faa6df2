//! Test RNG: deterministic `DeterministicRng` implementations for tests.

use grapevine_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min`. Word selection therefore picks the
/// first candidate and the coin flip always lands on the first occurrence.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that returns values from a predetermined sequence. Panics if the
/// sequence is exhausted. A mutation consumes two values: the candidate
/// index, then the coin flip (`0` = first occurrence, `1` = last).
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }
}
