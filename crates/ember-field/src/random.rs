//! Seedable randomness for particle initialization and respawning.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform sample in `[lo, hi)`.
    fn between(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// PCG-backed random source that remembers its seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the current system time.
    pub fn from_time() -> Self {
        Self::new(time_seed())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Nanoseconds since the epoch, or zero if the clock is before it.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Replays a fixed list of samples, cycling when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct Sequence {
    samples: Vec<f32>,
    next: usize,
}

#[cfg(test)]
impl Sequence {
    pub(crate) fn new(samples: &[f32]) -> Self {
        Self {
            samples: samples.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for Sequence {
    fn next_unit(&mut self) -> f32 {
        let value = self.samples[self.next % self.samples.len()];
        self.next += 1;
        value
    }
}
