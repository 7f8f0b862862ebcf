//! Stochastic SEIR epidemics with the Gillespie direct method.
//!
//! The population moves between four compartments (Susceptible, Exposed,
//! Infected, Recovered) through three transitions:
//!
//! | transition | propensity      |
//! |------------|-----------------|
//! | S → E      | `beta * S * I`  |
//! | E → I      | `kappa * E`     |
//! | I → R      | `gamma * I`     |
//!
//! A run draws exponential waiting times and weighted transition choices
//! until every requested observation time has been recorded. Each recorded
//! row holds the state the process was in at that time.
//!
//! ```
//! let parameters = [990.0, 0.0, 10.0, 0.0, 0.002, 0.5, 0.2];
//! let times: Vec<f64> = (0..=50).map(f64::from).collect();
//! let trajectory = seir_gillespie::simulate_seeded(&parameters, &times, 7)?;
//! assert_eq!(trajectory.shape(), (51, 4));
//! for row in trajectory.rows() {
//!     assert_eq!(row.iter().sum::<u64>(), 1000);
//! }
//! # Ok::<(), seir_gillespie::SimError>(())
//! ```
//!
//! With the `python` feature the crate builds a Python extension module
//! exposing `simulate`, `SEIRModel` and `SEIRModelFactory`.

mod config;
mod engine;
mod error;
mod grid;
mod model;
mod propensity;
mod trajectory;

#[cfg(feature = "python")]
mod python;

pub use config::{DEFAULT_MAX_TIME_STEP, SimulationConfig};
pub use engine::{FiredEvent, SsaEngine};
pub use error::{SimError, SimResult};
pub use grid::TimeGrid;
pub use model::{Compartment, ModelKind, SeirModel, SeirParameters};
pub use propensity::{RateLaw, Transition, recompute_propensities};
pub use trajectory::Trajectory;

/// Simulate the SEIR model once with a fresh random seed.
///
/// `parameters` is `[S0, E0, I0, R0, beta, kappa, gamma]`. The result has one
/// row per observation time and columns `[S, E, I, R]`.
pub fn simulate(parameters: &[f64], times: &[f64]) -> SimResult<Trajectory> {
    SeirModel::default().simulate(parameters, times)
}

/// Same as [`simulate`], reproducible for a given `seed`.
pub fn simulate_seeded(parameters: &[f64], times: &[f64], seed: u64) -> SimResult<Trajectory> {
    SeirModel::default()
        .with_config(SimulationConfig::seeded(seed))
        .simulate(parameters, times)
}
