//! Validation errors
//!
//! Every input check in Spendlog reports through [`ValidationError`]. These
//! are raised before any store access.

use thiserror::Error;

/// Result type for input validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Rejected input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ========================================================================
    // Expense Fields
    // ========================================================================

    /// Amount was zero or negative
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(String),

    /// Amount has sub-cent digits
    #[error("Amount {0} has more than 2 decimal places")]
    AmountPrecision(String),

    /// Amount does not fit NUMERIC(10,2)
    #[error("Amount {0} exceeds the maximum of 99999999.99")]
    AmountTooLarge(String),

    /// Title empty or longer than allowed
    #[error("Title must be between 1 and {max} characters, got {actual}")]
    TitleLength { max: usize, actual: usize },

    /// Description longer than allowed
    #[error("Description must be at most {max} characters, got {actual}")]
    DescriptionLength { max: usize, actual: usize },

    /// Category token not in the closed set
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    // ========================================================================
    // Query Parameters
    // ========================================================================

    /// Period type token not one of day, week, month, year
    #[error("Invalid period_type. Must be one of: day, week, month, year")]
    InvalidPeriodType(String),

    /// A bounded integer parameter was outside its range
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },

    /// Window start after window end
    #[error("Start date {start} is after end date {end}")]
    InvertedWindow { start: String, end: String },

    /// Date string in neither accepted format
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl ValidationError {
    /// Check that `actual` lies in the inclusive range `[min, max]`.
    pub fn check_range(
        field: &'static str,
        actual: i64,
        min: i64,
        max: i64,
    ) -> ValidationResult<()> {
        if actual < min || actual > max {
            return Err(Self::OutOfRange { field, min, max, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_bounds_are_inclusive() {
        assert!(ValidationError::check_range("month", 1, 1, 12).is_ok());
        assert!(ValidationError::check_range("month", 12, 1, 12).is_ok());
        assert_eq!(
            ValidationError::check_range("month", 13, 1, 12),
            Err(ValidationError::OutOfRange { field: "month", min: 1, max: 12, actual: 13 })
        );
    }

    #[test]
    fn test_period_type_message() {
        let err = ValidationError::InvalidPeriodType("quarter".into());
        assert_eq!(
            err.to_string(),
            "Invalid period_type. Must be one of: day, week, month, year"
        );
    }
}
