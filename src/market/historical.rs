//! Historical block-bootstrap return generation
//!
//! Two sampling schemes over a fixed annual-return history:
//! - **Contiguous**: each path is one run of consecutive historical years from a random
//!   start, wrapping back to the first year when it runs off the end of the history.
//! - **Windowed**: each path is stitched from several short contiguous windows with
//!   independent random starts, then trimmed to length. Short windows keep some
//!   year-to-year serial correlation while producing far more distinct paths.
//!
//! Both keep period 0 at zero return, like the random-walk model.

use rand::Rng;

use super::ensemble::ReturnEnsemble;
use crate::error::{ProjectionError, ProjectionResult};
use crate::matrix::PathMatrix;

/// Annual equity and bond returns by calendar year
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalReturns {
    years: Vec<i32>,
    equity: Vec<f64>,
    bond: Vec<f64>,
}

impl HistoricalReturns {
    pub fn new(years: Vec<i32>, equity: Vec<f64>, bond: Vec<f64>) -> ProjectionResult<Self> {
        if years.is_empty() {
            return Err(ProjectionError::invalid_parameter(
                "history",
                "return history is empty",
            ));
        }
        if equity.len() != years.len() || bond.len() != years.len() {
            return Err(ProjectionError::invalid_parameter(
                "history",
                format!(
                    "{} years but {} equity and {} bond returns",
                    years.len(),
                    equity.len(),
                    bond.len()
                ),
            ));
        }
        Ok(Self { years, equity, bond })
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn equity(&self) -> &[f64] {
        &self.equity
    }

    pub fn bond(&self) -> &[f64] {
        &self.bond
    }
}

/// `count` consecutive history indices from `start`, wrapping modulo `history_len`
pub fn wrapped_indices(start: usize, history_len: usize, count: usize) -> Vec<usize> {
    (start..start + count).map(|i| i % history_len).collect()
}

/// Turn per-path index lists into an ensemble, zeroing period 0
fn ensemble_from_indices(
    history: &HistoricalReturns,
    index_paths: Vec<Vec<usize>>,
    periods: usize,
) -> ReturnEnsemble {
    let paths = index_paths.len();
    let mut equity = PathMatrix::zeros(paths, periods);
    let mut bond = PathMatrix::zeros(paths, periods);
    let mut years = Vec::with_capacity(paths);

    for (p, indices) in index_paths.iter().enumerate() {
        let mut path_years = Vec::with_capacity(periods);
        for (i, &idx) in indices.iter().enumerate() {
            if i == 0 {
                path_years.push(None);
                continue;
            }
            equity.set(p, i, history.equity[idx]);
            bond.set(p, i, history.bond[idx]);
            path_years.push(Some(history.years[idx]));
        }
        years.push(path_years);
    }

    ReturnEnsemble::from_parts(equity, bond, Some(years))
}

/// One contiguous (wrapping) run of history per path
pub fn sample_contiguous<R: Rng + ?Sized>(
    rng: &mut R,
    history: &HistoricalReturns,
    periods: usize,
    paths: usize,
) -> ReturnEnsemble {
    let n = history.len();
    let index_paths = (0..paths)
        .map(|_| wrapped_indices(rng.gen_range(0..n), n, periods))
        .collect();

    ensemble_from_indices(history, index_paths, periods)
}

/// Concatenated windows of `window_length` consecutive years per path, trimmed to `periods`
pub fn sample_windowed<R: Rng + ?Sized>(
    rng: &mut R,
    history: &HistoricalReturns,
    periods: usize,
    window_length: usize,
    paths: usize,
) -> ProjectionResult<ReturnEnsemble> {
    if window_length == 0 {
        return Err(ProjectionError::invalid_parameter(
            "window_length",
            "must be at least one year",
        ));
    }

    let n = history.len();
    // One spare window so the concatenation always covers the horizon before trimming
    let windows_per_path = periods / window_length + 1;

    let index_paths = (0..paths)
        .map(|_| {
            let mut indices = Vec::with_capacity(windows_per_path * window_length);
            for _ in 0..windows_per_path {
                let start = rng.gen_range(0..n);
                indices.extend(wrapped_indices(start, n, window_length));
            }
            indices.truncate(periods);
            indices
        })
        .collect();

    Ok(ensemble_from_indices(history, index_paths, periods))
}
