//! Cumulative growth and annualized (geometric mean) returns

use crate::matrix::PathMatrix;

/// Geometric mean periodic return between two values over `periods` periods
///
/// `(end / start)^(1 / periods) - 1`. Non-finite when `start` is zero or the ratio is negative.
pub fn geometric_return(start: f64, end: f64, periods: f64) -> f64 {
    (end / start).powf(1.0 / periods) - 1.0
}

/// Running product of `1 + r` along each path, starting from period 1
///
/// Column `k` holds the growth factor through period `k + 1`, so the result has one fewer
/// column than the input. Period 0 is the starting point and never contributes.
pub fn cumulative_growth_factors(equity: &PathMatrix) -> PathMatrix {
    let (paths, periods) = equity.shape();
    let width = periods.saturating_sub(1);
    let mut growth = PathMatrix::zeros(paths, width);

    for p in 0..paths {
        let returns = equity.row(p);
        let out = growth.row_mut(p);
        let mut factor = 1.0;
        for k in 0..width {
            factor *= 1.0 + returns[k + 1];
            out[k] = factor;
        }
    }

    growth
}

/// Annualized return through `period`, read off a cumulative growth series
///
/// `growth_series` is indexed like a row of [`cumulative_growth_factors`]. Returns `None`
/// for period 0 (no elapsed time) or a period past the end of the series.
pub fn annualized_return_through(growth_series: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let factor = *growth_series.get(period - 1)?;
    Some(geometric_return(1.0, factor, period as f64))
}
