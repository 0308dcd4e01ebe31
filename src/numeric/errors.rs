// ============================================================================
// Numeric Errors
// ============================================================================

use std::fmt;

/// Errors raised when constructing or combining numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Prices and sizes must be strictly positive
    NonPositive,
    /// Result exceeded the representable range
    Overflow,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NonPositive => write!(f, "value must be positive"),
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded maximum value")
            },
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
