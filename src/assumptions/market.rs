//! Capital market assumptions for the return simulator

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};

/// Default annual real equity return mean
pub const DEFAULT_EQUITY_MEAN: f64 = 0.04;

/// Default annual equity return standard deviation
pub const DEFAULT_EQUITY_STDEV: f64 = 0.14;

/// Default constant annual bond return
pub const DEFAULT_BOND_RETURN: f64 = 0.01;

/// How market return paths are generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReturnModel {
    /// Independent normal equity draws, constant bond return
    RandomWalk,
    /// One contiguous run of historical years per path, wrapping at the end of history
    HistoricalContiguous,
    /// Short contiguous historical windows stitched together per path
    HistoricalWindowed {
        /// Years per sampled window
        window_length: usize,
    },
}

impl Default for ReturnModel {
    fn default() -> Self {
        ReturnModel::RandomWalk
    }
}

fn default_equity_mean() -> f64 {
    DEFAULT_EQUITY_MEAN
}

fn default_equity_stdev() -> f64 {
    DEFAULT_EQUITY_STDEV
}

fn default_bond_return() -> f64 {
    DEFAULT_BOND_RETURN
}

/// Market assumptions shared by every scenario in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAssumptions {
    /// Mean of the annual growth-asset return distribution
    #[serde(default = "default_equity_mean")]
    pub equity_mean: f64,

    /// Standard deviation of the annual growth-asset return distribution
    #[serde(default = "default_equity_stdev")]
    pub equity_stdev: f64,

    /// Constant annual income-asset return (random walk mode)
    #[serde(default = "default_bond_return")]
    pub bond_return: f64,

    #[serde(default)]
    pub model: ReturnModel,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            equity_mean: DEFAULT_EQUITY_MEAN,
            equity_stdev: DEFAULT_EQUITY_STDEV,
            bond_return: DEFAULT_BOND_RETURN,
            model: ReturnModel::RandomWalk,
        }
    }
}

impl MarketAssumptions {
    pub fn validate(&self) -> ProjectionResult<()> {
        if !self.equity_mean.is_finite() {
            return Err(ProjectionError::invalid_parameter(
                "equity_mean",
                "must be finite",
            ));
        }
        if !self.equity_stdev.is_finite() || self.equity_stdev < 0.0 {
            return Err(ProjectionError::invalid_parameter(
                "equity_stdev",
                format!("must be finite and >= 0, got {}", self.equity_stdev),
            ));
        }
        if !self.bond_return.is_finite() {
            return Err(ProjectionError::invalid_parameter(
                "bond_return",
                "must be finite",
            ));
        }
        if let ReturnModel::HistoricalWindowed { window_length: 0 } = self.model {
            return Err(ProjectionError::invalid_parameter(
                "window_length",
                "must be at least one year",
            ));
        }
        Ok(())
    }
}
