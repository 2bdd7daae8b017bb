//! Planning assumptions: mortality, market returns, glide path and counterfactual levels
//!
//! Market assumptions travel with [`crate::params::SimulationParameters`]; the
//! [`Assumptions`] container holds the policy settings shared by every household.

mod mortality;
mod market;
mod allocation;
pub mod loader;

pub use mortality::{
    age_for_survival_prob, derive_survival_profile, MortalityRow, MortalityTable, Sex,
    SurvivalProfile, SurvivalTarget,
};
pub use market::{MarketAssumptions, ReturnModel};
pub use allocation::GlidePath;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionResult;
use crate::scenario::CounterfactualConfig;

/// Allocation and counterfactual settings applied to every plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    #[serde(default)]
    pub glide: GlidePath,

    #[serde(default)]
    pub counterfactuals: CounterfactualConfig,
}

impl Assumptions {
    /// Parse assumptions from JSON; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> ProjectionResult<Self> {
        let assumptions: Self = serde_json::from_str(json)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Load assumptions from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ProjectionResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ProjectionResult<()> {
        self.glide.validate()?;
        self.counterfactuals.validate()
    }
}
