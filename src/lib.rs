//! Wealth Projection - Monte Carlo retirement planning engine
//!
//! This library provides:
//! - Mortality-derived planning horizons (age at which 25/10/5/1% of a cohort survives)
//! - Savings, spending and social security contribution schedules
//! - Glide-path equity allocation schedules
//! - Random-walk and historical block-bootstrap return ensembles
//! - Vectorized wealth trajectories with per-period percentile summaries
//! - Counterfactual comparisons (save more, retire later, spend less) on a shared ensemble

pub mod error;
pub mod matrix;
pub mod assumptions;
pub mod params;
pub mod market;
pub mod projection;
pub mod summary;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectionError, ProjectionResult};
pub use matrix::PathMatrix;
pub use assumptions::{Assumptions, GlidePath, MarketAssumptions, MortalityTable, ReturnModel, SurvivalProfile};
pub use params::SimulationParameters;
pub use market::{HistoricalReturns, ReturnEnsemble};
pub use projection::{project_wealth, SimulationContext, Timeline, WealthEngine};
pub use summary::{ByStatistic, DistributionSummary, MilestoneRecord, Statistic, WealthOutlook};
pub use scenario::{CounterfactualConfig, CounterfactualFamily, PlanReport, ScenarioRow, ScenarioRunner};
