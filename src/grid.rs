use crate::error::{SimError, SimResult};

/// Validated observation times.
///
/// Non-empty, finite and non-decreasing. The first entry is where the
/// simulation clock starts and the last entry is where recording ends.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    pub fn new(times: Vec<f64>) -> SimResult<Self> {
        if times.is_empty() {
            return Err(SimError::InvalidArgument(
                "observation times must contain at least one entry".into(),
            ));
        }
        if let Some(idx) = times.iter().position(|t| !t.is_finite()) {
            return Err(SimError::InvalidArgument(format!(
                "observation time at index {} is not finite",
                idx
            )));
        }
        if let Some(idx) = times.windows(2).position(|w| w[0] > w[1]) {
            return Err(SimError::InvalidArgument(format!(
                "observation times must be non-decreasing (index {} > index {})",
                idx,
                idx + 1
            )));
        }
        Ok(Self { times })
    }

    pub fn from_slice(times: &[f64]) -> SimResult<Self> {
        Self::new(times.to_vec())
    }

    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Length of the simulated window, `end - start`.
    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.times.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.times
    }
}

impl TryFrom<Vec<f64>> for TimeGrid {
    type Error = SimError;

    fn try_from(times: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(times)
    }
}

impl TryFrom<&[f64]> for TimeGrid {
    type Error = SimError;

    fn try_from(times: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(times)
    }
}
