//! Randomness sources for the simulation
//!
//! Every random decision in the core (shooter choice, enemy shot profile,
//! barrier erosion, bonus spawn timing and score tier) goes through
//! `RandomSource`, so tests can substitute a scripted sequence.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random draws used by the simulation
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`. Returns 0 when `upper` is 0.
    fn uniform_int(&mut self, upper: u32) -> u32;
    /// Uniform float in `[0, 1)`
    fn uniform_float(&mut self) -> f32;

    /// Pick a uniformly random index into a slice of `len` items
    fn pick_index(&mut self, len: usize) -> usize {
        self.uniform_int(len as u32) as usize
    }

    /// Uniform float in `[min, max)`
    fn uniform_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.uniform_float() * (max - min)
    }
}

/// Seeded PCG generator used in play
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the thread RNG (the seed is logged so a run can be replayed)
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        log::info!("Simulation RNG seed: {seed}");
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SimRng {
    fn uniform_int(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }

    fn uniform_float(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed sequence of draws, falling back to zero when exhausted
///
/// Integer draws are reduced modulo the requested bound; float draws are
/// clamped into `[0, 1)`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    ints: VecDeque<u32>,
    floats: VecDeque<f32>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = u32>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn with_floats(mut self, floats: impl IntoIterator<Item = f32>) -> Self {
        self.floats.extend(floats);
        self
    }
}

impl RandomSource for ScriptedRng {
    fn uniform_int(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.ints.pop_front().unwrap_or(0) % upper
    }

    fn uniform_float(&mut self) -> f32 {
        self.floats
            .pop_front()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0 - f32::EPSILON)
    }
}
