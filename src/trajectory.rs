//! Recorded trajectories and the sample-and-hold recording policy.

use crate::error::{SimError, SimResult};

/// Compartment counts at each observation time, row-major
/// `(n_times, n_compartments)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    n_compartments: usize,
    data: Vec<u64>,
}

impl Trajectory {
    pub(crate) fn from_parts(times: Vec<f64>, n_compartments: usize, data: Vec<u64>) -> Self {
        debug_assert_eq!(times.len() * n_compartments, data.len());
        Self {
            times,
            n_compartments,
            data,
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    pub fn n_compartments(&self) -> usize {
        self.n_compartments
    }

    /// `(rows, columns)` of the matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_times(), self.n_compartments)
    }

    pub fn row(&self, idx: usize) -> Option<&[u64]> {
        let start = idx.checked_mul(self.n_compartments)?;
        self.data.get(start..start + self.n_compartments)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.data.chunks_exact(self.n_compartments.max(1))
    }

    pub fn column(&self, idx: usize) -> Option<Vec<u64>> {
        (idx < self.n_compartments).then(|| self.rows().map(|row| row[idx]).collect())
    }

    pub fn final_state(&self) -> Option<&[u64]> {
        self.n_times()
            .checked_sub(1)
            .and_then(|last| self.row(last))
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u64> {
        self.data
    }

    /// Keep only the listed columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> SimResult<Self> {
        if let Some(&bad) = columns.iter().find(|&&c| c >= self.n_compartments) {
            return Err(SimError::InvalidArgument(format!(
                "column {} out of range for {} compartments",
                bad, self.n_compartments
            )));
        }
        let mut data = Vec::with_capacity(self.n_times() * columns.len());
        for row in self.rows() {
            data.extend(columns.iter().map(|&c| row[c]));
        }
        Ok(Self::from_parts(self.times.clone(), columns.len(), data))
    }
}

struct StateRecorder<'a> {
    buffer: &'a mut [u64],
    write_idx: usize,
    n_compartments: usize,
}

impl<'a> StateRecorder<'a> {
    fn new(buffer: &'a mut [u64], n_compartments: usize) -> Self {
        Self {
            buffer,
            write_idx: 0,
            n_compartments,
        }
    }

    fn record(&mut self, state: &[u64]) {
        let end = self.write_idx + self.n_compartments;
        debug_assert!(end <= self.buffer.len());
        self.buffer[self.write_idx..end].copy_from_slice(state);
        self.write_idx = end;
    }
}

/// Sample-and-hold writer for one run.
///
/// The output cursor only moves forward. An observation time receives the
/// state the process is in at that time, with jumps treated as
/// right-continuous: an event at exactly `t_k` is visible at `t_k`.
pub(crate) struct TrajectorySampler<'a> {
    times: &'a [f64],
    next_idx: usize,
    recorder: StateRecorder<'a>,
}

impl<'a> TrajectorySampler<'a> {
    pub(crate) fn new(times: &'a [f64], buffer: &'a mut [u64], n_compartments: usize) -> Self {
        debug_assert_eq!(buffer.len(), times.len() * n_compartments);
        Self {
            times,
            next_idx: 0,
            recorder: StateRecorder::new(buffer, n_compartments),
        }
    }

    /// Record every pending observation at or before `time`.
    pub(crate) fn record_through(&mut self, time: f64, state: &[u64]) {
        while let Some(&tp) = self.times.get(self.next_idx) {
            if tp > time {
                break;
            }
            self.recorder.record(state);
            self.next_idx += 1;
        }
    }

    /// Record every pending observation strictly before `time`; `state` is
    /// held over the gap that ends there.
    pub(crate) fn hold_until(&mut self, time: f64, state: &[u64]) {
        while let Some(&tp) = self.times.get(self.next_idx) {
            if tp >= time {
                break;
            }
            self.recorder.record(state);
            self.next_idx += 1;
        }
    }

    pub(crate) fn recorded(&self) -> usize {
        self.next_idx
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.next_idx >= self.times.len()
    }
}
