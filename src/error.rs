//! Failure taxonomy of the forecasting core.
//!
//! Every variant is recoverable at the call boundary. The core signals a typed failure
//! instead of returning a partially computed number; turning it into a user-facing
//! message is the caller's job.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Unreadable or unparseable source, or a table that doesn't match the expected schema
    #[error("failed to load {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    /// Too few observations for the requested model or policy
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Index-to-price translation against a zero (or non-finite) current index
    #[error("cannot rescale price against a current index of {0}")]
    Division(f64),

    /// No rows/entities match the requested entity or filter combination
    #[error("selection failed: {0}")]
    Selection(String),

    /// Forecast range that ends before (or does not reach past) the end of history
    #[error("invalid forecast horizon: {0}")]
    InvalidHorizon(String),

    /// Series that breaks an invariant required by the model (ordering, positivity)
    #[error("invalid series: {0}")]
    InvalidSeries(String),
}

impl CoreError {
    pub fn load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::Load {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
