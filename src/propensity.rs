//! Transition rates.
//!
//! A model is a list of [`Transition`]s; each moves one individual from
//! `source` to `target` at a rate given by its [`RateLaw`] evaluated on the
//! current compartment counts. The list order is the order in which event
//! selection walks the transitions.

/// How a transition's propensity depends on the state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateLaw {
    /// `rate * state[compartment]`
    Linear { rate: f64, compartment: usize },
    /// `rate * state[left] * state[right]`
    Bilinear {
        rate: f64,
        left: usize,
        right: usize,
    },
}

impl RateLaw {
    pub fn rate_constant(&self) -> f64 {
        match *self {
            RateLaw::Linear { rate, .. } | RateLaw::Bilinear { rate, .. } => rate,
        }
    }

    /// Same law with its rate constant multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            RateLaw::Linear { rate, compartment } => RateLaw::Linear {
                rate: rate * factor,
                compartment,
            },
            RateLaw::Bilinear { rate, left, right } => RateLaw::Bilinear {
                rate: rate * factor,
                left,
                right,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub source: usize,
    pub target: usize,
    pub law: RateLaw,
}

impl Transition {
    pub fn new(source: usize, target: usize, law: RateLaw) -> Self {
        Self {
            source,
            target,
            law,
        }
    }

    #[inline]
    pub fn propensity(&self, state: &[u64]) -> f64 {
        // An empty source compartment never fires, whatever the law says.
        if state[self.source] == 0 {
            return 0.0;
        }
        match self.law {
            RateLaw::Linear { rate, compartment } => rate * state[compartment] as f64,
            RateLaw::Bilinear { rate, left, right } => {
                rate * state[left] as f64 * state[right] as f64
            }
        }
    }

    /// Move one individual from `source` to `target`.
    #[inline]
    pub fn apply(&self, state: &mut [u64]) {
        debug_assert!(state[self.source] > 0);
        state[self.source] -= 1;
        state[self.target] += 1;
    }

    /// Largest compartment index this transition touches.
    pub fn max_compartment(&self) -> usize {
        let law_max = match self.law {
            RateLaw::Linear { compartment, .. } => compartment,
            RateLaw::Bilinear { left, right, .. } => left.max(right),
        };
        self.source.max(self.target).max(law_max)
    }
}

/// Fill `propensities` from `state` and return their sum.
pub fn recompute_propensities(
    transitions: &[Transition],
    state: &[u64],
    propensities: &mut [f64],
) -> f64 {
    debug_assert_eq!(transitions.len(), propensities.len());
    let mut total = 0.0;
    for (slot, transition) in propensities.iter_mut().zip(transitions) {
        let value = transition.propensity(state);
        total += value;
        *slot = value;
    }
    total
}
