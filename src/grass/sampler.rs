//! Seedable random stream shared by placement and geometry building.
//!
//! `reset()` rewinds to the start of the stream, so rebuilding a page draws
//! exactly the same numbers and places grass in exactly the same spots.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct DeterministicSampler {
    rng: ChaCha8Rng,
    draws: u64,
}

impl DeterministicSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Rewind to the first value of the stream.
    pub fn reset(&mut self) {
        self.rng.set_word_pos(0);
        self.draws = 0;
    }

    /// Uniform float in [0, 1).
    pub fn unit(&mut self) -> f32 {
        self.draws += 1;
        self.rng.random::<f32>()
    }

    /// Uniform float in [lo, hi). Returns `lo` when the range is empty.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// Values drawn since the last reset.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
