// ============================================================================
// Book Entry Domain Model
// ============================================================================

use super::client::{Client, ClientRequestId};
use super::errors::DomainError;
use super::event_id::EventId;
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Closed Tag Sets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Limit,
    Market,
}

impl EntryType {
    /// True if a price is required; false if the price must be absent.
    #[inline]
    pub fn price_required(self) -> bool {
        match self {
            EntryType::Limit => true,
            EntryType::Market => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Remains on the book until filled or cancelled
    GoodTillCancel,
    /// Fill what crosses immediately, cancel the remainder
    ImmediateOrCancel,
    /// Fill the entire size immediately or cancel it all
    FillOrKill,
}

impl TimeInForce {
    pub fn can_stay_on_book(self, sizes: EntrySizes) -> bool {
        match self {
            TimeInForce::GoodTillCancel => sizes.available > 0,
            TimeInForce::ImmediateOrCancel | TimeInForce::FillOrKill => false,
        }
    }

    /// The supported entry-type / time-in-force combinations: a market
    /// order cannot rest, so `Market` + `GoodTillCancel` is invalid.
    pub fn valid_combo(entry_type: EntryType, time_in_force: TimeInForce) -> bool {
        match entry_type {
            EntryType::Limit => true,
            EntryType::Market => !matches!(time_in_force, TimeInForce::GoodTillCancel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    New,
    PartialFill,
    Filled,
    Cancelled,
}

impl EntryStatus {
    pub fn is_final(self) -> bool {
        matches!(self, EntryStatus::Filled | EntryStatus::Cancelled)
    }

    /// Status after a trade, derived from the post-trade sizes.
    pub fn traded(self, new_sizes: EntrySizes) -> EntryStatus {
        if new_sizes.available == 0 {
            EntryStatus::Filled
        } else {
            EntryStatus::PartialFill
        }
    }
}

// ============================================================================
// Size Algebra
// ============================================================================

/// The quantity state of an entry, split into what can still trade, what has
/// traded, and what has been cancelled. The total never changes except by
/// amendment; the three buckets only move relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntrySizes {
    pub available: u64,
    pub traded: u64,
    pub cancelled: u64,
}

impl EntrySizes {
    pub fn new(available: u64) -> Self {
        Self {
            available,
            traded: 0,
            cancelled: 0,
        }
    }

    pub fn with(available: u64, traded: u64, cancelled: u64) -> Self {
        Self {
            available,
            traded,
            cancelled,
        }
    }

    /// Move `size` from available to traded.
    pub fn traded(self, size: u64) -> Result<Self, DomainError> {
        if size > self.available {
            return Err(DomainError::TradeExceedsAvailable {
                size,
                available: self.available,
            });
        }
        Ok(Self {
            available: self.available - size,
            traded: self.traded + size,
            cancelled: self.cancelled,
        })
    }

    /// Move all remaining available size to cancelled.
    pub fn cancelled(self) -> Self {
        Self {
            available: 0,
            traded: self.traded,
            cancelled: self.cancelled + self.available,
        }
    }

    /// Recompute available from a new total order size. The new total must
    /// leave a positive available size.
    pub fn amended(self, new_total: u64) -> Result<Self, DomainError> {
        let executed = self.traded + self.cancelled;
        if new_total <= executed {
            return Err(DomainError::AmendBelowExecuted { new_total, executed });
        }
        Ok(Self {
            available: new_total - executed,
            traded: self.traded,
            cancelled: self.cancelled,
        })
    }
}

// ============================================================================
// Priority Key
// ============================================================================

/// The identity of an entry inside a book: price (absent for market
/// entries), submission time, then sequence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookEntryKey {
    pub price: Option<Price>,
    pub when_submitted: DateTime<Utc>,
    pub event_id: EventId,
}

impl BookEntryKey {
    /// The side-normalised ordering key. Map iteration order over these keys
    /// IS the matching/display priority order, so insertion never re-sorts:
    ///
    /// 1. price — best first (descending for buys, ascending for sells),
    ///    with unpriced (market) entries ahead of any price;
    /// 2. submission time, earliest first;
    /// 3. event id, smallest first.
    pub fn priority(&self, side: Side) -> PriorityKey {
        let rank = self.price.map(|price| match side {
            Side::Buy => -price.value(),
            Side::Sell => price.value(),
        });
        PriorityKey {
            rank,
            when_submitted: self.when_submitted,
            event_id: self.event_id,
        }
    }
}

/// Side-normalised total order over [`BookEntryKey`]s. `None` ranks ahead of
/// any price (`Option`'s derived order), and buy prices are negated so the
/// derived lexicographic order always reads best-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityKey {
    rank: Option<i64>,
    when_submitted: DateTime<Utc>,
    event_id: EventId,
}

// ============================================================================
// Book Entry
// ============================================================================

/// One resting order, or one leg of a mass quote, as held by a side of the
/// book. Entries are owned exclusively by their [`LimitBook`]; everything
/// else sees value-copy snapshots.
///
/// [`LimitBook`]: super::limit_book::LimitBook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub key: BookEntryKey,
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub is_quote: bool,
    pub entry_type: EntryType,
    pub side: Side,
    pub time_in_force: TimeInForce,
    pub sizes: EntrySizes,
    pub status: EntryStatus,
}

impl BookEntry {
    /// The entry after trading `size`, with its status re-derived.
    pub fn traded(&self, size: u64) -> Result<Self, DomainError> {
        let sizes = self.sizes.traded(size)?;
        Ok(Self {
            sizes,
            status: self.status.traded(sizes),
            ..self.clone()
        })
    }

    /// The entry with its remaining size cancelled.
    pub fn cancelled(&self) -> Self {
        Self {
            sizes: self.sizes.cancelled(),
            status: EntryStatus::Cancelled,
            ..self.clone()
        }
    }

    /// The entry re-keyed to a fresh sequence id. Used when a matched
    /// remainder rests: the added entry takes the id of the event that adds
    /// it, keeping book keys unique.
    pub fn with_event_id(&self, event_id: EventId) -> Self {
        Self {
            key: BookEntryKey {
                event_id,
                ..self.key
            },
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key(price: Option<i64>, secs: i64, event_id: u64) -> BookEntryKey {
        BookEntryKey {
            price: price.map(|p| Price::new(p).unwrap()),
            when_submitted: Utc.timestamp_opt(secs, 0).unwrap(),
            event_id: EventId::new(event_id),
        }
    }

    #[test]
    fn test_traded_moves_available_to_traded() {
        let sizes = EntrySizes::with(100, 25, 33);
        assert_eq!(sizes.traded(25).unwrap(), EntrySizes::with(75, 50, 33));
    }

    #[test]
    fn test_traded_more_than_available_is_fatal() {
        let sizes = EntrySizes::new(10);
        assert_eq!(
            sizes.traded(11),
            Err(DomainError::TradeExceedsAvailable {
                size: 11,
                available: 10
            })
        );
    }

    #[test]
    fn test_cancelled_moves_all_available() {
        let sizes = EntrySizes::with(100, 25, 33);
        assert_eq!(sizes.cancelled(), EntrySizes::with(0, 25, 133));
    }

    #[test]
    fn test_amended_recomputes_available() {
        let sizes = EntrySizes::with(100, 25, 33);
        assert_eq!(sizes.amended(158).unwrap(), EntrySizes::with(100, 25, 33));
        assert_eq!(sizes.amended(60).unwrap(), EntrySizes::with(2, 25, 33));
        assert_eq!(
            sizes.amended(58),
            Err(DomainError::AmendBelowExecuted {
                new_total: 58,
                executed: 58
            })
        );
    }

    #[test]
    fn test_status_follows_sizes() {
        assert_eq!(EntryStatus::New.traded(EntrySizes::with(1, 9, 0)), EntryStatus::PartialFill);
        assert_eq!(EntryStatus::New.traded(EntrySizes::with(0, 10, 0)), EntryStatus::Filled);
        assert!(EntryStatus::Filled.is_final());
        assert!(EntryStatus::Cancelled.is_final());
        assert!(!EntryStatus::PartialFill.is_final());
    }

    #[test]
    fn test_market_good_till_cancel_is_invalid() {
        assert!(TimeInForce::valid_combo(EntryType::Limit, TimeInForce::GoodTillCancel));
        assert!(TimeInForce::valid_combo(EntryType::Limit, TimeInForce::ImmediateOrCancel));
        assert!(TimeInForce::valid_combo(EntryType::Limit, TimeInForce::FillOrKill));
        assert!(!TimeInForce::valid_combo(EntryType::Market, TimeInForce::GoodTillCancel));
        assert!(TimeInForce::valid_combo(EntryType::Market, TimeInForce::ImmediateOrCancel));
        assert!(TimeInForce::valid_combo(EntryType::Market, TimeInForce::FillOrKill));
    }

    #[test]
    fn test_only_good_till_cancel_rests() {
        let open = EntrySizes::new(5);
        assert!(TimeInForce::GoodTillCancel.can_stay_on_book(open));
        assert!(!TimeInForce::GoodTillCancel.can_stay_on_book(EntrySizes::new(0)));
        assert!(!TimeInForce::ImmediateOrCancel.can_stay_on_book(open));
        assert!(!TimeInForce::FillOrKill.can_stay_on_book(open));
    }

    #[test]
    fn test_buy_priority_prefers_higher_price() {
        let better = key(Some(12), 0, 2).priority(Side::Buy);
        let worse = key(Some(11), 0, 1).priority(Side::Buy);
        assert!(better < worse);
    }

    #[test]
    fn test_sell_priority_prefers_lower_price() {
        let better = key(Some(11), 0, 2).priority(Side::Sell);
        let worse = key(Some(12), 0, 1).priority(Side::Sell);
        assert!(better < worse);
    }

    #[test]
    fn test_market_entries_rank_first_on_either_side() {
        for side in [Side::Buy, Side::Sell] {
            let market = key(None, 9, 9).priority(side);
            let limit = key(Some(1), 0, 1).priority(side);
            assert!(market < limit);
        }
    }

    #[test]
    fn test_equal_price_falls_back_to_time_then_event_id() {
        let earlier = key(Some(10), 1, 5).priority(Side::Buy);
        let later = key(Some(10), 2, 4).priority(Side::Buy);
        assert!(earlier < later);

        let first = key(Some(10), 1, 4).priority(Side::Buy);
        let second = key(Some(10), 1, 5).priority(Side::Buy);
        assert!(first < second);
    }
}
