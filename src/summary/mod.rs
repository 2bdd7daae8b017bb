//! Ensemble reduction: per-period percentiles and the milestones derived from them

mod distribution;
mod milestones;

pub use distribution::{
    percentile, summarize, summarize_values, ByStatistic, DistributionSummary, Statistic,
};
pub use milestones::{
    depletion_age, forever_income, milestone_stats, MilestoneRecord, WealthOutlook,
    GROWTH_THRESHOLD, STABLE_THRESHOLD,
};
