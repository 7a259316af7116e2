//! Error types for engine operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the engine contract.
///
/// `InvalidDate` and `InvalidRange` are input-validation failures and are
/// rejected synchronously; `Unavailable` is surfaced distinctly so callers
/// can prompt the guest to pick new dates rather than fix their input.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Departure {departure} must be after arrival {arrival}")]
    InvalidRange {
        arrival: NaiveDate,
        departure: NaiveDate,
    },

    #[error("Dates {arrival} to {departure} are no longer available")]
    Unavailable {
        arrival: NaiveDate,
        departure: NaiveDate,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
