//! Cross-sectional distribution summaries of a paths x periods matrix

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matrix::PathMatrix;

/// Summary statistics reported for every period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    P75,
    P50,
    P25,
    P10,
    P5,
    P1,
}

impl Statistic {
    /// Reporting order: mean first, then percentiles from best to worst
    pub const ALL: [Statistic; 7] = [
        Statistic::Mean,
        Statistic::P75,
        Statistic::P50,
        Statistic::P25,
        Statistic::P10,
        Statistic::P5,
        Statistic::P1,
    ];

    /// Percentile rank in [0, 100], or None for the mean
    pub fn percentile(self) -> Option<f64> {
        match self {
            Statistic::Mean => None,
            Statistic::P75 => Some(75.0),
            Statistic::P50 => Some(50.0),
            Statistic::P25 => Some(25.0),
            Statistic::P10 => Some(10.0),
            Statistic::P5 => Some(5.0),
            Statistic::P1 => Some(1.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::P75 => "p75",
            Statistic::P50 => "p50",
            Statistic::P25 => "p25",
            Statistic::P10 => "p10",
            Statistic::P5 => "p5",
            Statistic::P1 => "p1",
        }
    }
}

/// One value per [`Statistic`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByStatistic<T> {
    pub mean: T,
    pub p75: T,
    pub p50: T,
    pub p25: T,
    pub p10: T,
    pub p5: T,
    pub p1: T,
}

impl<T> ByStatistic<T> {
    pub fn from_fn<F: FnMut(Statistic) -> T>(mut f: F) -> Self {
        Self {
            mean: f(Statistic::Mean),
            p75: f(Statistic::P75),
            p50: f(Statistic::P50),
            p25: f(Statistic::P25),
            p10: f(Statistic::P10),
            p5: f(Statistic::P5),
            p1: f(Statistic::P1),
        }
    }

    pub fn get(&self, stat: Statistic) -> &T {
        match stat {
            Statistic::Mean => &self.mean,
            Statistic::P75 => &self.p75,
            Statistic::P50 => &self.p50,
            Statistic::P25 => &self.p25,
            Statistic::P10 => &self.p10,
            Statistic::P5 => &self.p5,
            Statistic::P1 => &self.p1,
        }
    }

    pub fn map<U, F: FnMut(Statistic, &T) -> U>(&self, mut f: F) -> ByStatistic<U> {
        ByStatistic::from_fn(|stat| f(stat, self.get(stat)))
    }

    /// Entries in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (Statistic, &T)> {
        Statistic::ALL.into_iter().map(move |stat| (stat, self.get(stat)))
    }
}

/// Per-period series for each statistic
pub type DistributionSummary = ByStatistic<Vec<f64>>;

/// Percentile of already-sorted values with linear interpolation between closest ranks
///
/// Returns NaN for an empty slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (pct / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let value = sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64);
            // keep rounding from stepping outside the bracketing values
            value.max(sorted[lo]).min(sorted[hi])
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Statistics of one cross-section of values
pub fn summarize_values(values: &mut [f64]) -> ByStatistic<f64> {
    values.sort_by(f64::total_cmp);
    ByStatistic::from_fn(|stat| match stat.percentile() {
        Some(pct) => percentile(values, pct),
        None => mean(values),
    })
}

/// Summarize every period of `matrix` across paths
///
/// Each statistic is computed independently per period, so a percentile series does not
/// follow any single simulated path.
pub fn summarize(matrix: &PathMatrix) -> DistributionSummary {
    let per_period: Vec<ByStatistic<f64>> = (0..matrix.periods())
        .into_par_iter()
        .map(|period| summarize_values(&mut matrix.column(period)))
        .collect();

    ByStatistic::from_fn(|stat| per_period.iter().map(|s| *s.get(stat)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 50.0), 3.0);
        assert_eq!(percentile(&sorted, 75.0), 4.0);
        assert_relative_eq!(percentile(&sorted, 10.0), 1.4, epsilon = 1e-12);
        assert_relative_eq!(percentile(&sorted, 1.0), 1.04, epsilon = 1e-12);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 5.0);
        assert_eq!(percentile(&[7.0], 25.0), 7.0);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_summarize_columns() {
        let m = PathMatrix::from_rows(vec![
            vec![0.0, 10.0],
            vec![0.0, 30.0],
            vec![0.0, 20.0],
            vec![0.0, 40.0],
        ])
        .unwrap();
        let summary = summarize(&m);

        assert_eq!(summary.mean, vec![0.0, 25.0]);
        assert_eq!(summary.p50, vec![0.0, 25.0]);
        assert_relative_eq!(summary.p75[1], 32.5);
        assert_relative_eq!(summary.p25[1], 17.5);
        assert_relative_eq!(summary.p1[1], 10.3, epsilon = 1e-9);
    }

    #[test]
    fn test_by_statistic_map_and_order() {
        let counts = ByStatistic::from_fn(|stat| stat.percentile().unwrap_or(-1.0));
        let labels: Vec<_> = counts.iter().map(|(stat, _)| stat.label()).collect();
        assert_eq!(labels, ["mean", "p75", "p50", "p25", "p10", "p5", "p1"]);

        let doubled = counts.map(|_, v| v * 2.0);
        assert_eq!(doubled.p5, 10.0);
        assert_eq!(doubled.mean, -2.0);
    }

    proptest! {
        #[test]
        fn test_percentiles_ordered(
            rows in prop::collection::vec(prop::collection::vec(-1e9f64..1e9, 4), 1..40),
        ) {
            let m = PathMatrix::from_rows(rows).unwrap();
            let s = summarize(&m);
            for i in 0..m.periods() {
                prop_assert!(s.p75[i] >= s.p50[i]);
                prop_assert!(s.p50[i] >= s.p25[i]);
                prop_assert!(s.p25[i] >= s.p10[i]);
                prop_assert!(s.p10[i] >= s.p5[i]);
                prop_assert!(s.p5[i] >= s.p1[i]);
            }
        }
    }
}
