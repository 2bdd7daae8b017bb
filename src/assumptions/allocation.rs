//! Glide-path allocation policy

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, ProjectionResult};

/// Default growth-asset share from retirement onward
pub const DEFAULT_TERMINAL_ALLOCATION: f64 = 0.6;

/// Default number of years over which the allocation glides down before retirement
pub const DEFAULT_GLIDE_LENGTH: u32 = 10;

fn default_terminal_allocation() -> f64 {
    DEFAULT_TERMINAL_ALLOCATION
}

fn default_glide_length() -> u32 {
    DEFAULT_GLIDE_LENGTH
}

/// Linear glide from 100% growth assets to `terminal_allocation` at retirement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlidePath {
    #[serde(default = "default_terminal_allocation")]
    pub terminal_allocation: f64,

    #[serde(default = "default_glide_length")]
    pub glide_length: u32,
}

impl Default for GlidePath {
    fn default() -> Self {
        Self {
            terminal_allocation: DEFAULT_TERMINAL_ALLOCATION,
            glide_length: DEFAULT_GLIDE_LENGTH,
        }
    }
}

impl GlidePath {
    pub fn validate(&self) -> ProjectionResult<()> {
        if !(0.0..=1.0).contains(&self.terminal_allocation) {
            return Err(ProjectionError::invalid_parameter(
                "terminal_allocation",
                format!("must lie in [0, 1], got {}", self.terminal_allocation),
            ));
        }
        Ok(())
    }
}
