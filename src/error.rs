//! Error types shared by the projection engine and its loaders

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Invalid age {age}: {reason}")]
    InvalidAge { age: u32, reason: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Mortality table is empty")]
    EmptyTable,

    #[error("Mortality table ages are not contiguous: expected {expected}, found {found}")]
    NonContiguousTable { expected: u32, found: u32 },

    #[error("Death probability {value} at age {age} is outside [0, 1]")]
    ProbabilityOutOfRange { age: u32, value: f64 },

    #[error("Shape mismatch in {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Historical return model requested but no return history was loaded")]
    MissingHistory,

    #[error("Could not parse return value '{value}'")]
    ParseReturn { value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;

impl ProjectionError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_age(age: u32, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidAge {
            age,
            reason: reason.into(),
        }
    }
}
