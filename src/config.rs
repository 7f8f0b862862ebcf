use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{SimError, SimResult};

/// Scale factor for the degenerate-rate fallback. With no transition
/// possible, the clock advances by `span * max_time_step` on average.
pub const DEFAULT_MAX_TIME_STEP: f64 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub max_time_step: f64,
    /// `None` draws a fresh seed for every run.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_time_step: DEFAULT_MAX_TIME_STEP,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_max_time_step(mut self, max_time_step: f64) -> Self {
        self.max_time_step = max_time_step;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.max_time_step.is_finite() || self.max_time_step <= 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "max_time_step must be a positive finite number, got {}",
                self.max_time_step
            )));
        }
        Ok(())
    }

    /// Generator for one run.
    pub fn rng(&self) -> ChaCha8Rng {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        ChaCha8Rng::seed_from_u64(seed)
    }
}
