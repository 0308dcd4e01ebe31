// ============================================================================
// Event Id
// Wrapping per-book sequence number
// ============================================================================

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Monotonic per-book sequence number with explicit wraparound.
///
/// `u64::MAX` is immediately followed by `0`, so the total order and the
/// succession test are wrap-aware rather than plain integer comparison.
/// Within one aggregate, every applied event's id must be the direct
/// successor of the previous one; the id doubles as the final tie-breaker
/// in book priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EventId(u64);

impl EventId {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The next sequence number, wrapping at `u64::MAX`.
    #[inline]
    pub const fn next(self) -> Self {
        match self.0 {
            u64::MAX => Self(0),
            value => Self(value + 1),
        }
    }

    /// True if `self` is the direct successor of `other`, including the
    /// wrap from `u64::MAX` to `0`.
    #[inline]
    pub const fn is_next_of(self, other: EventId) -> bool {
        if other.0 == u64::MAX {
            self.0 == 0
        } else {
            self.0 == other.0 + 1
        }
    }
}

impl Ord for EventId {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == u64::MAX && other.0 == 0 {
            Ordering::Less
        } else if self.0 == 0 && other.0 == u64::MAX {
            Ordering::Greater
        } else {
            self.0.cmp(&other.0)
        }
    }
}

impl PartialOrd for EventId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
