//! Return ensemble shared by the baseline and every counterfactual scenario

use rand::Rng;

use super::historical::{sample_contiguous, sample_windowed, HistoricalReturns};
use super::random_walk::{constant_returns, simulate_random_walk};
use crate::assumptions::{MarketAssumptions, ReturnModel};
use crate::error::{ProjectionError, ProjectionResult};
use crate::matrix::PathMatrix;

/// Historical calendar year behind each simulated period (None for period 0)
pub type SampledYears = Vec<Vec<Option<i32>>>;

/// Growth-asset and income-asset return paths of identical shape
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnEnsemble {
    equity: PathMatrix,
    bond: PathMatrix,
    sampled_years: Option<SampledYears>,
}

impl ReturnEnsemble {
    /// Build from externally supplied return matrices, checking that the shapes agree
    pub fn new(equity: PathMatrix, bond: PathMatrix) -> ProjectionResult<Self> {
        if equity.shape() != bond.shape() {
            return Err(ProjectionError::ShapeMismatch {
                what: "bond returns",
                expected: equity.shape(),
                found: bond.shape(),
            });
        }
        Ok(Self::from_parts(equity, bond, None))
    }

    /// Internal constructor for generators that build matching shapes by construction
    pub(crate) fn from_parts(
        equity: PathMatrix,
        bond: PathMatrix,
        sampled_years: Option<SampledYears>,
    ) -> Self {
        debug_assert_eq!(equity.shape(), bond.shape());
        Self {
            equity,
            bond,
            sampled_years,
        }
    }

    pub fn equity(&self) -> &PathMatrix {
        &self.equity
    }

    pub fn bond(&self) -> &PathMatrix {
        &self.bond
    }

    pub fn sampled_years(&self) -> Option<&SampledYears> {
        self.sampled_years.as_ref()
    }

    pub fn paths(&self) -> usize {
        self.equity.paths()
    }

    pub fn periods(&self) -> usize {
        self.equity.periods()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.equity.shape()
    }
}

/// Generate the ensemble for a run according to the configured return model
///
/// Historical models need `history`; the random-walk model ignores it.
pub fn generate_ensemble<R: Rng + ?Sized>(
    rng: &mut R,
    market: &MarketAssumptions,
    history: Option<&HistoricalReturns>,
    periods: usize,
    paths: usize,
) -> ProjectionResult<ReturnEnsemble> {
    let ensemble = match market.model {
        ReturnModel::RandomWalk => {
            let equity =
                simulate_random_walk(rng, market.equity_mean, market.equity_stdev, periods, paths)?;
            let bond = constant_returns(market.bond_return, periods, paths);
            ReturnEnsemble::from_parts(equity, bond, None)
        }
        ReturnModel::HistoricalContiguous => {
            let history = history.ok_or(ProjectionError::MissingHistory)?;
            sample_contiguous(rng, history, periods, paths)
        }
        ReturnModel::HistoricalWindowed { window_length } => {
            let history = history.ok_or(ProjectionError::MissingHistory)?;
            sample_windowed(rng, history, periods, window_length, paths)?
        }
    };

    log::debug!(
        "Generated {:?} return ensemble: {} paths x {} periods",
        market.model,
        ensemble.paths(),
        ensemble.periods()
    );

    Ok(ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::seeded_rng;

    #[test]
    fn test_new_rejects_mismatched_shapes() {
        let err = ReturnEnsemble::new(PathMatrix::zeros(3, 4), PathMatrix::zeros(3, 5)).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::ShapeMismatch {
                expected: (3, 4),
                found: (3, 5),
                ..
            }
        ));
    }

    #[test]
    fn test_random_walk_ensemble_has_constant_bonds() {
        let market = MarketAssumptions::default();
        let ensemble = generate_ensemble(&mut seeded_rng(1), &market, None, 10, 8).unwrap();

        assert_eq!(ensemble.shape(), (8, 10));
        assert!(ensemble.sampled_years().is_none());
        for p in 0..8 {
            assert_eq!(ensemble.bond().get(p, 0), 0.0);
            assert_eq!(ensemble.bond().get(p, 9), market.bond_return);
        }
    }

    #[test]
    fn test_historical_model_requires_history() {
        let market = MarketAssumptions {
            model: ReturnModel::HistoricalContiguous,
            ..Default::default()
        };
        let err = generate_ensemble(&mut seeded_rng(1), &market, None, 10, 8).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingHistory));

        let history =
            HistoricalReturns::new(vec![1990, 1991, 1992], vec![0.1, -0.2, 0.3], vec![0.0; 3]).unwrap();
        let ensemble = generate_ensemble(&mut seeded_rng(1), &market, Some(&history), 10, 8).unwrap();
        assert!(ensemble.sampled_years().is_some());
    }
}
