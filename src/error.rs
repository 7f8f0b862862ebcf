use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("parameter shape mismatch: expected {expected} values, got {actual}")]
    InvalidParameterShape { expected: usize, actual: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A propensity overflowed `f64`; the waiting time and event weights are undefined.
    #[error("total propensity {total} is not finite at t = {time}")]
    NonFiniteRate { time: f64, total: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
