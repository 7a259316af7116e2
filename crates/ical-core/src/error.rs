//! Error types for calendar text parsing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IcalError {
    #[error("Unparseable date value: {0}")]
    InvalidDate(String),

    #[error("Unparseable timestamp value: {0}")]
    InvalidStamp(String),
}

pub type Result<T> = std::result::Result<T, IcalError>;
