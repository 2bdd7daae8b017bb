//! Core wealth recurrence over a paths x periods return ensemble

use rayon::prelude::*;

use crate::market::ReturnEnsemble;
use crate::matrix::PathMatrix;

/// Project wealth along every path
///
/// Period 0 holds `starting_wealth[p]`. For each later period the prior wealth grows at the
/// allocation-weighted return, then the period's contribution is added:
///
/// `w[i] = w[i-1] * ((1 + e[i]) * a[i] + (1 + b[i]) * (1 - a[i])) + c[i]`
///
/// Wealth may go negative; nothing is clamped.
///
/// # Panics
/// If any input matrix disagrees with the equity matrix's shape, or `starting_wealth` does
/// not have one entry per path.
pub fn project_wealth(
    starting_wealth: &[f64],
    equity: &PathMatrix,
    bond: &PathMatrix,
    allocations: &PathMatrix,
    contributions: &PathMatrix,
) -> PathMatrix {
    let shape = equity.shape();
    assert_eq!(bond.shape(), shape, "bond returns shape mismatch");
    assert_eq!(allocations.shape(), shape, "allocations shape mismatch");
    assert_eq!(contributions.shape(), shape, "contributions shape mismatch");
    assert_eq!(starting_wealth.len(), shape.0, "starting wealth length mismatch");

    let (paths, periods) = shape;
    let mut wealth = PathMatrix::zeros(paths, periods);
    if periods == 0 {
        return wealth;
    }

    // Paths are independent, so each row is filled on its own worker
    wealth
        .as_mut_slice()
        .par_chunks_mut(periods)
        .enumerate()
        .for_each(|(p, row)| {
            let e = equity.row(p);
            let b = bond.row(p);
            let a = allocations.row(p);
            let c = contributions.row(p);

            row[0] = starting_wealth[p];
            for i in 1..periods {
                let growth = (1.0 + e[i]) * a[i] + (1.0 + b[i]) * (1.0 - a[i]);
                row[i] = row[i - 1] * growth + c[i];
            }
        });

    wealth
}

/// Projects one household plan against a fixed return ensemble
///
/// Schedules are shared by every path, so they are taken as per-period slices and
/// broadcast across the ensemble.
pub struct WealthEngine<'e> {
    ensemble: &'e ReturnEnsemble,
}

impl<'e> WealthEngine<'e> {
    pub fn new(ensemble: &'e ReturnEnsemble) -> Self {
        Self { ensemble }
    }

    pub fn ensemble(&self) -> &ReturnEnsemble {
        self.ensemble
    }

    /// Wealth for every path from a common starting amount and shared schedules
    ///
    /// # Panics
    /// If either schedule's length differs from the ensemble's period count.
    pub fn project(
        &self,
        starting_wealth: f64,
        allocations: &[f64],
        contributions: &[f64],
    ) -> PathMatrix {
        let paths = self.ensemble.paths();
        project_wealth(
            &vec![starting_wealth; paths],
            self.ensemble.equity(),
            self.ensemble.bond(),
            &PathMatrix::broadcast(allocations, paths),
            &PathMatrix::broadcast(contributions, paths),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{constant_returns, seeded_rng, simulate_random_walk};
    use crate::projection::{build_allocations, build_contributions};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_zero_returns_single_contribution() {
        // Age 40 with a horizon of 100 gives 61 periods
        let mut contributions = vec![0.0; 61];
        contributions[1] = 10_000.0;
        let allocations = vec![1.0; 61];

        let ensemble =
            ReturnEnsemble::new(constant_returns(0.0, 61, 1), constant_returns(0.0, 61, 1)).unwrap();
        let wealth = WealthEngine::new(&ensemble).project(100_000.0, &allocations, &contributions);

        assert_eq!(wealth.shape(), (1, 61));
        assert_eq!(wealth.get(0, 0), 100_000.0);
        assert_eq!(wealth.get(0, 1), 110_000.0);
        assert_eq!(wealth.get(0, 2), 110_000.0);
        assert_eq!(wealth.get(0, 60), 110_000.0);
    }

    #[test]
    fn test_schedules_drive_projection() {
        // Save 10k at age 41, then retire at 42 with no spending
        let contributions = build_contributions(40, 42, 100, 10_000.0, 0.0, 67, 0.0);
        let allocations = build_allocations(40, 42, 100, 0.6, 10);

        let ensemble =
            ReturnEnsemble::new(constant_returns(0.0, 61, 3), constant_returns(0.0, 61, 3)).unwrap();
        let wealth = WealthEngine::new(&ensemble).project(100_000.0, &allocations, &contributions);

        for p in 0..3 {
            assert_relative_eq!(wealth.get(p, 1), 110_000.0, epsilon = 1e-6);
            assert_relative_eq!(wealth.get(p, 60), 110_000.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_mixed_allocation_growth() {
        let equity = constant_returns(0.10, 3, 1);
        let bond = constant_returns(0.02, 3, 1);
        let allocations = PathMatrix::broadcast(&[1.0, 0.5, 0.5], 1);
        let contributions = PathMatrix::broadcast(&[0.0, 0.0, -100.0], 1);

        let wealth = project_wealth(&[1_000.0], &equity, &bond, &allocations, &contributions);
        assert_relative_eq!(wealth.get(0, 1), 1_060.0, epsilon = 1e-9);
        assert_relative_eq!(wealth.get(0, 2), 1_060.0 * 1.06 - 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wealth_may_go_negative() {
        let returns = constant_returns(0.0, 4, 1);
        let contributions = PathMatrix::broadcast(&[0.0, -50.0, -50.0, -50.0], 1);
        let allocations = PathMatrix::filled(1, 4, 1.0);
        let wealth = project_wealth(&[100.0], &returns, &returns, &allocations, &contributions);
        assert_eq!(wealth.row(0), &[100.0, 50.0, 0.0, -50.0]);
    }

    #[test]
    fn test_per_path_starting_wealth() {
        let returns = constant_returns(0.0, 2, 2);
        let allocations = PathMatrix::filled(2, 2, 1.0);
        let contributions = PathMatrix::zeros(2, 2);
        let wealth = project_wealth(&[1.0, 2.0], &returns, &returns, &allocations, &contributions);
        assert_eq!(wealth.column(1), vec![1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "contributions shape mismatch")]
    fn test_shape_mismatch_panics() {
        let returns = constant_returns(0.0, 5, 2);
        let allocations = PathMatrix::filled(2, 5, 1.0);
        let contributions = PathMatrix::zeros(2, 4);
        project_wealth(&[0.0, 0.0], &returns, &returns, &allocations, &contributions);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_full_equity_no_flows_tracks_cumulative_return(
            seed in any::<u64>(),
            start in 1.0f64..1e7,
        ) {
            let mut rng = seeded_rng(seed);
            let equity = simulate_random_walk(&mut rng, 0.04, 0.14, 20, 4).unwrap();
            let bond = constant_returns(0.01, 20, 4);
            let allocations = PathMatrix::filled(4, 20, 1.0);
            let contributions = PathMatrix::zeros(4, 20);

            let wealth = project_wealth(&[start; 4], &equity, &bond, &allocations, &contributions);
            for p in 0..4 {
                let mut expected = start;
                for i in 1..20 {
                    expected *= 1.0 + equity.get(p, i);
                    prop_assert!((wealth.get(p, i) - expected).abs() <= 1e-9 * expected.abs().max(1.0));
                }
            }
        }
    }
}
