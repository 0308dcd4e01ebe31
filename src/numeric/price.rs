// ============================================================================
// Price
// Instrument-scaled integer price
// ============================================================================

use super::errors::{NumericError, NumericResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A price normalised by the instrument's decimal scale.
///
/// Internally stores `value × 10^decimals` as an `i64`, where the number of
/// decimals is a per-instrument constant held outside the matching core.
/// E.g. with 2 decimals, `1234` represents `12.34`. Comparison is exact
/// integer comparison; no floating point is involved anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from an already-scaled value.
    ///
    /// # Errors
    /// Returns `NonPositive` for zero or negative values: the book never
    /// holds a non-positive price.
    #[inline]
    pub fn new(value: i64) -> NumericResult<Self> {
        if value <= 0 {
            return Err(NumericError::NonPositive);
        }
        Ok(Self(value))
    }

    /// Raw scaled value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A size resting at a price, as submitted in one side of a quote level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeAtPrice {
    pub price: Price,
    pub size: u64,
}

impl SizeAtPrice {
    pub fn new(price: Price, size: u64) -> Self {
        Self { price, size }
    }
}
