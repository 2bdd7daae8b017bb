//! Random-walk return generation (the default market model)

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{ProjectionError, ProjectionResult};
use crate::matrix::PathMatrix;

/// Draw `paths x periods` independent normal returns with the given mean and standard
/// deviation. Period 0 is "now" and carries no market exposure, so it is forced to zero.
///
/// Paths are drawn in row order from the single generator, so the same seed always
/// produces the same matrix.
pub fn simulate_random_walk<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    stdev: f64,
    periods: usize,
    paths: usize,
) -> ProjectionResult<PathMatrix> {
    let normal = Normal::new(mean, stdev).map_err(|e| {
        ProjectionError::invalid_parameter("equity_stdev", format!("{} (stdev = {})", e, stdev))
    })?;

    let mut returns = PathMatrix::zeros(paths, periods);
    for p in 0..paths {
        let row = returns.row_mut(p);
        for value in row.iter_mut().skip(1) {
            *value = normal.sample(rng);
        }
    }

    Ok(returns)
}

/// Constant-return series for every path, with period 0 zeroed like the simulated series
pub fn constant_returns(rate: f64, periods: usize, paths: usize) -> PathMatrix {
    let mut returns = PathMatrix::filled(paths, periods, rate);
    if periods > 0 {
        returns.fill_column(0, 0.0);
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::seeded_rng;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_first_period_zero() {
        let mut rng = seeded_rng(7);
        let returns = simulate_random_walk(&mut rng, 0.04, 0.14, 30, 50).unwrap();
        assert_eq!(returns.shape(), (50, 30));
        assert!(returns.column(0).iter().all(|&r| r == 0.0));
        assert!(returns.column(1).iter().any(|&r| r != 0.0));
    }

    #[test]
    fn test_same_seed_same_draws() {
        let a = simulate_random_walk(&mut seeded_rng(42), 0.04, 0.14, 20, 10).unwrap();
        let b = simulate_random_walk(&mut seeded_rng(42), 0.04, 0.14, 20, 10).unwrap();
        let c = simulate_random_walk(&mut seeded_rng(43), 0.04, 0.14, 20, 10).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sample_moments() {
        let mut rng = seeded_rng(1);
        let returns = simulate_random_walk(&mut rng, 0.04, 0.14, 101, 2_000).unwrap();

        let draws: Vec<f64> = returns.rows().flat_map(|r| r[1..].to_vec()).collect();
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let var = draws.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert_abs_diff_eq!(mean, 0.04, epsilon = 0.002);
        assert_abs_diff_eq!(var.sqrt(), 0.14, epsilon = 0.002);
    }

    #[test]
    fn test_zero_stdev_is_deterministic() {
        let mut rng = seeded_rng(3);
        let returns = simulate_random_walk(&mut rng, 0.05, 0.0, 5, 3).unwrap();
        assert_eq!(returns.row(2), &[0.0, 0.05, 0.05, 0.05, 0.05]);
    }

    #[test]
    fn test_invalid_stdev() {
        let mut rng = seeded_rng(3);
        assert!(simulate_random_walk(&mut rng, 0.05, -1.0, 5, 3).is_err());
        assert!(simulate_random_walk(&mut rng, 0.05, f64::NAN, 5, 3).is_err());
    }

    #[test]
    fn test_constant_returns() {
        let bonds = constant_returns(0.01, 4, 2);
        assert_eq!(bonds.row(0), &[0.0, 0.01, 0.01, 0.01]);
        assert_eq!(bonds.row(1), bonds.row(0));
        assert_eq!(constant_returns(0.01, 0, 2).shape(), (2, 0));
    }
}
