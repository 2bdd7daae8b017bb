//! Scalar milestones read off the per-period distribution summaries

use serde::{Deserialize, Serialize};

use super::distribution::{ByStatistic, DistributionSummary};
use crate::projection::annualized_return_through;

/// End wealth above this multiple of wealth at retirement counts as growing
pub const GROWTH_THRESHOLD: f64 = 1.2;

/// End wealth above this multiple (and at most [`GROWTH_THRESHOLD`]) counts as stable
pub const STABLE_THRESHOLD: f64 = 0.8;

/// Age at the first period whose wealth is zero or negative, if any
pub fn depletion_age(trajectory: &[f64], ages: &[u32]) -> Option<u32> {
    trajectory
        .iter()
        .zip(ages)
        .find(|(wealth, _)| **wealth <= 0.0)
        .map(|(_, age)| *age)
}

/// How wealth develops over retirement for one summary statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WealthOutlook {
    /// Wealth reaches zero at this age
    RunsOut { age: u32 },
    GrowsForever,
    RemainsStable,
    DeclinesButLasts,
}

impl WealthOutlook {
    pub fn classify(depletion_age: Option<u32>, wealth_at_retirement: f64, wealth_at_end: f64) -> Self {
        if let Some(age) = depletion_age {
            return WealthOutlook::RunsOut { age };
        }
        if wealth_at_end > GROWTH_THRESHOLD * wealth_at_retirement {
            WealthOutlook::GrowsForever
        } else if wealth_at_end > STABLE_THRESHOLD * wealth_at_retirement {
            WealthOutlook::RemainsStable
        } else {
            WealthOutlook::DeclinesButLasts
        }
    }

    /// Short sentence for tabular output
    pub fn describe(&self) -> String {
        match self {
            WealthOutlook::RunsOut { age } => format!("runs out at age {}", age),
            WealthOutlook::GrowsForever => "grows forever".to_string(),
            WealthOutlook::RemainsStable => "remains stable".to_string(),
            WealthOutlook::DeclinesButLasts => "declines but lasts".to_string(),
        }
    }
}

/// Milestones for one summary statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    pub wealth_at_retirement: f64,

    /// Annualized equity return through retirement; None when retiring at period 0
    pub return_to_retirement: Option<f64>,

    pub wealth_at_end: f64,
    pub return_to_end: Option<f64>,
    pub depletion_age: Option<u32>,
    pub outlook: WealthOutlook,
}

/// Milestones per statistic
///
/// `wealth` is the per-period wealth summary and `growth` the summary of cumulative equity
/// growth factors (one column shorter, starting at period 1). Returns are derived from the
/// growth series so contributions do not inflate them.
///
/// # Panics
/// If `retirement_index` or `final_index` is outside the wealth series.
pub fn milestone_stats(
    wealth: &DistributionSummary,
    growth: &DistributionSummary,
    ages: &[u32],
    retirement_index: usize,
    final_index: usize,
) -> ByStatistic<MilestoneRecord> {
    wealth.map(|stat, series| {
        let growth_series = growth.get(stat);
        let wealth_at_retirement = series[retirement_index];
        let wealth_at_end = series[final_index];
        let depletion = depletion_age(series, ages);

        MilestoneRecord {
            wealth_at_retirement,
            return_to_retirement: annualized_return_through(growth_series, retirement_index),
            wealth_at_end,
            return_to_end: annualized_return_through(growth_series, final_index),
            depletion_age: depletion,
            outlook: WealthOutlook::classify(depletion, wealth_at_retirement, wealth_at_end),
        }
    })
}

/// Sustainable perpetual withdrawal per statistic
pub fn forever_income(
    milestones: &ByStatistic<MilestoneRecord>,
    withdrawal_rate: f64,
) -> ByStatistic<f64> {
    milestones.map(|_, record| record.wealth_at_retirement * withdrawal_rate)
}
