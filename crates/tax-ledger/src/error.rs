use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid date: '{0}' is not a recognised calendar date")]
    InvalidDate(String),

    #[error("Transaction vector length mismatch: expected {expected} entries, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid quantity for {asset}: {value}")]
    InvalidQuantity { asset: String, value: f64 },

    #[error("Date {0} has already been logged")]
    DuplicateDate(NaiveDate),

    #[error(
        "Insufficient lots to cover sale of {requested} {asset} on {date}: only {available} available"
    )]
    InsufficientLots {
        asset: String,
        date: NaiveDate,
        requested: f64,
        available: f64,
    },

    #[error("No dates have been logged yet")]
    NoDates,

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
