//! Epidemic model kinds, their parameters and output naming.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::config::SimulationConfig;
use crate::engine::{FiredEvent, SsaEngine};
use crate::error::{SimError, SimResult};
use crate::grid::TimeGrid;
use crate::propensity::{RateLaw, Transition};
use crate::trajectory::Trajectory;

/// Counts above 2^53 are not exactly representable as `f64` parameters.
const MAX_EXACT_COUNT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compartment {
    Susceptible = 0,
    Exposed = 1,
    Infected = 2,
    Recovered = 3,
}

impl Compartment {
    pub const ALL: [Compartment; 4] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infected,
        Compartment::Recovered,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Compartment::Susceptible => "S",
            Compartment::Exposed => "E",
            Compartment::Infected => "I",
            Compartment::Recovered => "R",
        }
    }
}

/// Supported model variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Stochastic SEIR solved with the direct-method Gillespie algorithm.
    GillespieSeir,
}

impl ModelKind {
    pub const ALL: [ModelKind; 1] = [ModelKind::GillespieSeir];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::GillespieSeir => "gillespie_seir",
        }
    }

    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            ModelKind::GillespieSeir => &["S0", "E0", "I0", "R0", "beta", "kappa", "gamma"],
        }
    }

    pub fn output_names(self) -> &'static [&'static str] {
        match self {
            ModelKind::GillespieSeir => &["S", "E", "I", "R"],
        }
    }

    pub fn n_parameters(self) -> usize {
        self.parameter_names().len()
    }

    pub fn n_outputs(self) -> usize {
        self.output_names().len()
    }

    pub fn build(self) -> SeirModel {
        SeirModel::new(self)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gillespie_seir" | "gillespieSEIR" | "GillespieSEIR" => Ok(ModelKind::GillespieSeir),
            other => Err(SimError::InvalidArgument(format!(
                "unknown model kind '{}' (expected one of: {})",
                other,
                ModelKind::ALL.map(ModelKind::name).join(", ")
            ))),
        }
    }
}

/// `[S0, E0, I0, R0, beta, kappa, gamma]`, validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeirParameters {
    pub initial: [u64; 4],
    pub beta: f64,
    pub kappa: f64,
    pub gamma: f64,
}

impl SeirParameters {
    pub const LEN: usize = 7;

    pub fn from_slice(values: &[f64]) -> SimResult<Self> {
        if values.len() != Self::LEN {
            return Err(SimError::InvalidParameterShape {
                expected: Self::LEN,
                actual: values.len(),
            });
        }
        let names = ModelKind::GillespieSeir.parameter_names();

        let mut initial = [0u64; 4];
        for (idx, (slot, &value)) in initial.iter_mut().zip(&values[..4]).enumerate() {
            *slot = parse_count(names[idx], value)?;
        }
        let mut rates = [0.0; 3];
        for (idx, (slot, &value)) in rates.iter_mut().zip(&values[4..]).enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidArgument(format!(
                    "{} must be finite and non-negative, got {}",
                    names[4 + idx],
                    value
                )));
            }
            *slot = value;
        }
        let [beta, kappa, gamma] = rates;
        Ok(Self {
            initial,
            beta,
            kappa,
            gamma,
        })
    }

    pub fn population(&self) -> u64 {
        self.initial.iter().sum()
    }

    /// S→E, E→I, I→R, in that order.
    pub fn transitions(&self) -> Vec<Transition> {
        use Compartment::*;
        vec![
            Transition::new(
                Susceptible.index(),
                Exposed.index(),
                RateLaw::Bilinear {
                    rate: self.beta,
                    left: Susceptible.index(),
                    right: Infected.index(),
                },
            ),
            Transition::new(
                Exposed.index(),
                Infected.index(),
                RateLaw::Linear {
                    rate: self.kappa,
                    compartment: Exposed.index(),
                },
            ),
            Transition::new(
                Infected.index(),
                Recovered.index(),
                RateLaw::Linear {
                    rate: self.gamma,
                    compartment: Infected.index(),
                },
            ),
        ]
    }
}

fn parse_count(name: &str, value: f64) -> SimResult<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "{} must be a finite non-negative count, got {}",
            name, value
        )));
    }
    if value.fract() != 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "{} must be a whole number, got {}",
            name, value
        )));
    }
    if value > MAX_EXACT_COUNT {
        return Err(SimError::InvalidArgument(format!(
            "{} = {} exceeds the largest supported count",
            name, value
        )));
    }
    Ok(value as u64)
}

/// One model instance: its kind, the selected output columns and the run
/// configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SeirModel {
    kind: ModelKind,
    outputs: Vec<usize>,
    config: SimulationConfig,
}

impl SeirModel {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            outputs: (0..kind.n_outputs()).collect(),
            config: SimulationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    pub fn n_parameters(&self) -> usize {
        self.kind.n_parameters()
    }

    pub fn parameter_names(&self) -> &'static [&'static str] {
        self.kind.parameter_names()
    }

    /// Number of currently selected outputs.
    pub fn n_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn output_names(&self) -> Vec<&'static str> {
        let names = self.kind.output_names();
        self.outputs.iter().map(|&idx| names[idx]).collect()
    }

    /// Restrict the returned columns to `names`. Columns keep the model's
    /// canonical order; duplicates are ignored.
    pub fn set_outputs<S: AsRef<str>>(&mut self, names: &[S]) -> SimResult<()> {
        let known = self.kind.output_names();
        let requested: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
        if requested.is_empty() {
            return Err(SimError::InvalidArgument(
                "at least one output must be selected".into(),
            ));
        }
        if let Some(unknown) = requested.iter().find(|name| !known.contains(*name)) {
            return Err(SimError::InvalidArgument(format!(
                "unknown output '{}' (expected one of: {})",
                unknown,
                known.join(", ")
            )));
        }
        self.outputs = known
            .iter()
            .enumerate()
            .filter(|(_, name)| requested.contains(*name))
            .map(|(idx, _)| idx)
            .collect();
        Ok(())
    }

    pub fn engine(&self, parameters: &SeirParameters) -> SimResult<SsaEngine> {
        self.config.validate()?;
        match self.kind {
            ModelKind::GillespieSeir => SsaEngine::new(
                parameters.transitions(),
                self.kind.n_outputs(),
                self.config.max_time_step,
            ),
        }
    }

    /// Run once with the configured seed (or a fresh one).
    pub fn simulate(&self, parameters: &[f64], times: &[f64]) -> SimResult<Trajectory> {
        let mut rng = self.config.rng();
        self.simulate_with_rng(parameters, times, &mut rng)
    }

    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        parameters: &[f64],
        times: &[f64],
        rng: &mut R,
    ) -> SimResult<Trajectory> {
        self.simulate_observed(parameters, times, rng, |_| {})
    }

    pub fn simulate_observed<R, F>(
        &self,
        parameters: &[f64],
        times: &[f64],
        rng: &mut R,
        on_event: F,
    ) -> SimResult<Trajectory>
    where
        R: Rng + ?Sized,
        F: FnMut(FiredEvent),
    {
        let parameters = SeirParameters::from_slice(parameters)?;
        let grid = TimeGrid::from_slice(times)?;
        let engine = self.engine(&parameters)?;
        let trajectory = engine.run_observed(&parameters.initial, &grid, rng, on_event)?;
        if self.outputs.len() == self.kind.n_outputs() {
            Ok(trajectory)
        } else {
            trajectory.select_columns(&self.outputs)
        }
    }
}

impl Default for SeirModel {
    fn default() -> Self {
        Self::new(ModelKind::GillespieSeir)
    }
}
