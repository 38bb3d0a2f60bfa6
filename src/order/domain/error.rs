//! Error types for order domain validation and parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing domain order values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderDomainError {
    /// A required text field is empty after trimming.
    #[error("order field '{0}' must not be empty")]
    MissingField(&'static str),

    /// The requested quantity is not a positive machine count.
    #[error("invalid quantity {0}, expected a positive integer")]
    InvalidQuantity(i64),

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A date range ends before it starts.
    #[error("invalid date range: {end} is before {start}")]
    InvalidDateRange {
        /// First day of the requested range.
        start: NaiveDate,
        /// Last day of the requested range.
        end: NaiveDate,
    },

    /// A month filter is outside `1..=12`.
    #[error("invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    /// An order identifier is not a valid UUID.
    #[error("invalid order identifier '{0}'")]
    InvalidOrderId(String),

    /// A status value could not be recognised.
    #[error(transparent)]
    UnknownStatus(#[from] ParseOrderStatusError),
}

/// Error returned while parsing order statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);
