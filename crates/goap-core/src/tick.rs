use crate::{rng, SplitMix64};

/// Per-tick input handed to the agent by the host loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The context for the following tick, keeping `dt_seconds` and `seed`.
    pub fn next(&self) -> Self {
        Self {
            tick: self.tick + 1,
            ..*self
        }
    }

    /// Deterministic RNG for this tick; `stream` separates independent consumers.
    pub fn rng(&self, stream: u64) -> SplitMix64 {
        SplitMix64::new(rng::derive_seed(self.seed, self.tick, stream))
    }
}
