//! Household plan parameters

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assumptions::MarketAssumptions;
use crate::error::{ProjectionError, ProjectionResult};

/// Default social security claiming age
pub const DEFAULT_SOCIAL_SECURITY_AGE: u32 = 67;

/// Default number of simulated paths
pub const DEFAULT_NUM_PATHS: usize = 10_000;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

fn default_social_security_age() -> u32 {
    DEFAULT_SOCIAL_SECURITY_AGE
}

fn default_num_paths() -> usize {
    DEFAULT_NUM_PATHS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Immutable inputs for one projection run
///
/// All monetary amounts are annual, in today's dollars, and already normalized to numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_wealth: f64,

    /// Amount saved each year before retirement
    pub annual_savings: f64,

    /// Amount spent each year from retirement onward
    pub annual_spending: f64,

    #[serde(default = "default_social_security_age")]
    pub social_security_age: u32,

    /// Annual benefit received from `social_security_age` onward
    #[serde(default)]
    pub social_security_benefit: f64,

    #[serde(default = "default_num_paths")]
    pub num_paths: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Calendar year of period 0; the current year when absent
    #[serde(default)]
    pub start_year: Option<i32>,

    #[serde(default)]
    pub market: MarketAssumptions,
}

impl SimulationParameters {
    /// Parameters with default social security, path count, seed and market assumptions
    pub fn new(
        current_age: u32,
        retirement_age: u32,
        current_wealth: f64,
        annual_savings: f64,
        annual_spending: f64,
    ) -> Self {
        Self {
            current_age,
            retirement_age,
            current_wealth,
            annual_savings,
            annual_spending,
            social_security_age: DEFAULT_SOCIAL_SECURITY_AGE,
            social_security_benefit: 0.0,
            num_paths: DEFAULT_NUM_PATHS,
            seed: DEFAULT_SEED,
            start_year: None,
            market: MarketAssumptions::default(),
        }
    }

    /// Builder-style social security override
    pub fn with_social_security(mut self, claim_age: u32, annual_benefit: f64) -> Self {
        self.social_security_age = claim_age;
        self.social_security_benefit = annual_benefit;
        self
    }

    pub fn with_paths(mut self, num_paths: usize) -> Self {
        self.num_paths = num_paths;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the invariants every downstream component relies on
    pub fn validate(&self) -> ProjectionResult<()> {
        if self.retirement_age < self.current_age {
            return Err(ProjectionError::invalid_age(
                self.retirement_age,
                format!(
                    "retirement age is before current age {}",
                    self.current_age
                ),
            ));
        }

        let amounts = [
            ("current_wealth", self.current_wealth),
            ("annual_savings", self.annual_savings),
            ("annual_spending", self.annual_spending),
            ("social_security_benefit", self.social_security_benefit),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::invalid_parameter(
                    name,
                    format!("must be a finite amount >= 0, got {}", value),
                ));
            }
        }

        if self.num_paths == 0 {
            return Err(ProjectionError::invalid_parameter(
                "num_paths",
                "at least one path is required",
            ));
        }

        self.market.validate()
    }

    /// Parse and validate parameters from JSON
    pub fn from_json_str(json: &str) -> ProjectionResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ProjectionResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let params = SimulationParameters::from_json_str(
            r#"{
                "current_age": 39,
                "retirement_age": 46,
                "current_wealth": 1100000,
                "annual_savings": 105000,
                "annual_spending": 70000
            }"#,
        )
        .unwrap();

        assert_eq!(params.social_security_age, 67);
        assert_eq!(params.social_security_benefit, 0.0);
        assert_eq!(params.num_paths, 10_000);
        assert_eq!(params.seed, 42);
        assert_eq!(params.start_year, None);
        assert_eq!(params.market, MarketAssumptions::default());
        assert_eq!(params, SimulationParameters::new(39, 46, 1_100_000.0, 105_000.0, 70_000.0));
    }

    #[test]
    fn test_retirement_before_current_age() {
        let params = SimulationParameters::new(50, 45, 0.0, 0.0, 0.0);
        assert!(matches!(
            params.validate(),
            Err(ProjectionError::InvalidAge { age: 45, .. })
        ));
    }

    #[test]
    fn test_negative_amounts_and_zero_paths() {
        let params = SimulationParameters::new(40, 65, -1.0, 0.0, 0.0);
        assert!(matches!(
            params.validate(),
            Err(ProjectionError::InvalidParameter { name: "current_wealth", .. })
        ));

        let params = SimulationParameters::new(40, 65, 0.0, 0.0, 0.0).with_paths(0);
        assert!(matches!(
            params.validate(),
            Err(ProjectionError::InvalidParameter { name: "num_paths", .. })
        ));

        let params = SimulationParameters::new(40, 65, 0.0, 0.0, 0.0).with_social_security(67, f64::NAN);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_retire_now_is_valid() {
        let params = SimulationParameters::new(60, 60, 500_000.0, 0.0, 40_000.0);
        assert!(params.validate().is_ok());
    }
}
