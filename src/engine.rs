//! Direct-method Gillespie event loop.

use log::{debug, trace};
use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::grid::TimeGrid;
use crate::propensity::{Transition, recompute_propensities};
use crate::trajectory::{Trajectory, TrajectorySampler};

/// A transition that fired, and the simulated time at which it did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiredEvent {
    pub time: f64,
    pub transition: usize,
}

#[derive(Clone, Debug)]
pub struct SsaEngine {
    transitions: Vec<Transition>,
    n_compartments: usize,
    max_time_step: f64,
}

impl SsaEngine {
    pub fn new(
        transitions: Vec<Transition>,
        n_compartments: usize,
        max_time_step: f64,
    ) -> SimResult<Self> {
        if n_compartments == 0 {
            return Err(SimError::InvalidArgument(
                "a model needs at least one compartment".into(),
            ));
        }
        if !max_time_step.is_finite() || max_time_step <= 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "max_time_step must be a positive finite number, got {}",
                max_time_step
            )));
        }
        for (idx, transition) in transitions.iter().enumerate() {
            if transition.max_compartment() >= n_compartments {
                return Err(SimError::InvalidArgument(format!(
                    "transition {} refers to a compartment outside 0..{}",
                    idx, n_compartments
                )));
            }
            if transition.source == transition.target {
                return Err(SimError::InvalidArgument(format!(
                    "transition {} has the same source and target",
                    idx
                )));
            }
            let rate = transition.law.rate_constant();
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimError::InvalidArgument(format!(
                    "transition {} rate constant must be finite and non-negative, got {}",
                    idx, rate
                )));
            }
        }
        Ok(Self {
            transitions,
            n_compartments,
            max_time_step,
        })
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn n_compartments(&self) -> usize {
        self.n_compartments
    }

    pub fn max_time_step(&self) -> f64 {
        self.max_time_step
    }

    /// Total rate substituted when no transition is possible.
    fn fallback_rate(&self, span: f64) -> f64 {
        debug_assert!(span > 0.0);
        1.0 / (span * self.max_time_step)
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        initial_state: &[u64],
        times: &TimeGrid,
        rng: &mut R,
    ) -> SimResult<Trajectory> {
        self.run_observed(initial_state, times, rng, |_| {})
    }

    /// Like [`run`](Self::run), reporting every fired transition to `on_event`.
    pub fn run_observed<R, F>(
        &self,
        initial_state: &[u64],
        times: &TimeGrid,
        rng: &mut R,
        mut on_event: F,
    ) -> SimResult<Trajectory>
    where
        R: Rng + ?Sized,
        F: FnMut(FiredEvent),
    {
        if initial_state.len() != self.n_compartments {
            return Err(SimError::InvalidArgument(format!(
                "initial state length {} does not match number of compartments {}",
                initial_state.len(),
                self.n_compartments
            )));
        }

        let n = self.n_compartments;
        let mut state = initial_state.to_vec();
        let mut propensities = vec![0.0; self.transitions.len()];
        let mut data = vec![0u64; times.len() * n];
        let mut current_time = times.start();
        let mut fired = 0usize;
        let mut absorbed = false;

        debug!(
            "ssa run: population {}, {} observation times over [{}, {}], fallback rate {}",
            state.iter().sum::<u64>(),
            times.len(),
            times.start(),
            times.end(),
            1.0 / (times.span() * self.max_time_step)
        );

        let mut sampler = TrajectorySampler::new(times.as_slice(), &mut data, n);
        loop {
            sampler.record_through(current_time, &state);
            if sampler.is_complete() {
                break;
            }

            let mut total_propensity =
                recompute_propensities(&self.transitions, &state, &mut propensities);
            if !total_propensity.is_finite() {
                return Err(SimError::NonFiniteRate {
                    time: current_time,
                    total: total_propensity,
                });
            }
            let degenerate = total_propensity <= 0.0;
            if degenerate {
                // Pending times lie after `current_time`, so the span is positive here.
                total_propensity = self.fallback_rate(times.span());
                if !absorbed {
                    debug!(
                        "no transition possible at t = {}, advancing at fallback rate {}",
                        current_time, total_propensity
                    );
                    absorbed = true;
                }
                if !total_propensity.is_finite() {
                    // span * max_time_step underflowed; the state is frozen anyway.
                    sampler.hold_until(f64::INFINITY, &state);
                    break;
                }
            }

            let mut u1: f64 = rng.random();
            if u1 <= 0.0 {
                u1 = 1.0;
            }
            let tau = -u1.ln() / total_propensity;
            let next_time = current_time + tau;
            if degenerate && tau > 0.0 && next_time <= current_time {
                // Clock cannot move at this magnitude and nothing can fire.
                sampler.hold_until(f64::INFINITY, &state);
                break;
            }
            sampler.hold_until(next_time, &state);
            current_time = next_time;

            let u2: f64 = 1.0 - rng.random::<f64>();
            if let Some(chosen) = select_transition(&propensities, total_propensity, u2) {
                self.transitions[chosen].apply(&mut state);
                fired += 1;
                trace!("t = {}: transition {} -> {:?}", current_time, chosen, state);
                on_event(FiredEvent {
                    time: current_time,
                    transition: chosen,
                });
            }
        }
        debug_assert_eq!(sampler.recorded(), times.len());

        debug!(
            "ssa run finished at t = {} after {} events",
            current_time, fired
        );
        Ok(Trajectory::from_parts(times.as_slice().to_vec(), n, data))
    }
}

/// Linear weighted choice. `u` is in `(0, 1]`; each propensity is normalised
/// by `total` and subtracted in order until `u` is exhausted.
///
/// Returns `None` when every propensity is zero (the fallback rate is in use).
fn select_transition(propensities: &[f64], total: f64, u: f64) -> Option<usize> {
    let mut remaining = u;
    let mut last_positive = None;
    for (idx, &propensity) in propensities.iter().enumerate() {
        if propensity > 0.0 {
            last_positive = Some(idx);
        }
        remaining -= propensity / total;
        if remaining <= 0.0 {
            return Some(idx);
        }
    }
    // Rounding can leave a sliver of `u` after the walk.
    last_positive
}
