use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while building domain values (filters, page positions, schedules).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD or DD.MM.YYYY")]
    InvalidDate { value: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid hour {0}: expected 0-23")]
    InvalidHour(u32),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, CoreError>;
