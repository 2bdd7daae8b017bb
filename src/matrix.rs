//! Dense paths x periods matrix used for returns, allocations, contributions and wealth
//!
//! Storage is row-major: row `p` holds the full period sequence of simulated path `p`,
//! so a single path can be handed out as a contiguous slice.

use serde::{Deserialize, Serialize};

/// Row-major `paths x periods` matrix of `f64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMatrix {
    paths: usize,
    periods: usize,
    data: Vec<f64>,
}

impl PathMatrix {
    /// Matrix of the given shape filled with `value`
    pub fn filled(paths: usize, periods: usize, value: f64) -> Self {
        Self {
            paths,
            periods,
            data: vec![value; paths * periods],
        }
    }

    pub fn zeros(paths: usize, periods: usize) -> Self {
        Self::filled(paths, periods, 0.0)
    }

    /// Build from one `Vec` per path. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let paths = rows.len();
        let periods = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != periods) {
            return None;
        }
        Some(Self {
            paths,
            periods,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Repeat a per-period schedule for every path
    pub fn broadcast(schedule: &[f64], paths: usize) -> Self {
        let mut data = Vec::with_capacity(schedule.len() * paths);
        for _ in 0..paths {
            data.extend_from_slice(schedule);
        }
        Self {
            paths,
            periods: schedule.len(),
            data,
        }
    }

    pub fn paths(&self) -> usize {
        self.paths
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    /// (paths, periods)
    pub fn shape(&self) -> (usize, usize) {
        (self.paths, self.periods)
    }

    pub fn get(&self, path: usize, period: usize) -> f64 {
        self.data[path * self.periods + period]
    }

    pub fn set(&mut self, path: usize, period: usize, value: f64) {
        self.data[path * self.periods + period] = value;
    }

    /// Full period sequence for one path
    pub fn row(&self, path: usize) -> &[f64] {
        let start = path * self.periods;
        &self.data[start..start + self.periods]
    }

    pub fn row_mut(&mut self, path: usize) -> &mut [f64] {
        let start = path * self.periods;
        &mut self.data[start..start + self.periods]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.periods.max(1)).take(self.paths)
    }

    /// Cross-path values for one period (copied, since storage is row-major)
    pub fn column(&self, period: usize) -> Vec<f64> {
        (0..self.paths).map(|p| self.get(p, period)).collect()
    }

    /// Set every path's value at `period`
    pub fn fill_column(&mut self, period: usize, value: f64) {
        for p in 0..self.paths {
            self.set(p, period, value);
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
