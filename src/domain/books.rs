// ============================================================================
// Books Aggregate
// ============================================================================

use super::entry::{BookEntry, BookEntryKey, EntrySizes, EntryStatus, Side};
use super::errors::DomainError;
use super::event_id::EventId;
use super::limit_book::LimitBook;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one instrument's order books.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Trading Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingStatus {
    OpenForTrading,
    Closed,
    Halted,
    PreOpen,
    NotAvailableForTrading,
}

impl TradingStatus {
    /// Whether new orders and mass quotes are admitted under this status.
    pub fn allows_placing(self) -> bool {
        matches!(self, TradingStatus::OpenForTrading)
    }
}

impl fmt::Display for TradingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TradingStatus::OpenForTrading => "Open for Trading",
            TradingStatus::Closed => "Closed",
            TradingStatus::Halted => "Halted",
            TradingStatus::PreOpen => "Pre-open",
            TradingStatus::NotAvailableForTrading => "Not available for Trading",
        };
        f.write_str(text)
    }
}

/// The layered trading statuses of a book. The effective status resolves by
/// priority: manual override, then fast-market, then the scheduled status,
/// then the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingStatuses {
    pub manual: Option<TradingStatus>,
    pub fast_market: Option<TradingStatus>,
    pub scheduled: Option<TradingStatus>,
    pub default: TradingStatus,
}

impl TradingStatuses {
    pub fn new(default: TradingStatus) -> Self {
        Self {
            manual: None,
            fast_market: None,
            scheduled: None,
            default,
        }
    }

    pub fn effective(&self) -> TradingStatus {
        self.manual
            .or(self.fast_market)
            .or(self.scheduled)
            .unwrap_or(self.default)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// The per-instrument aggregate: both sides of the book, the trading
/// statuses, the business date and the last applied sequence number.
///
/// `Books` is only ever mutated by playing events; every mutating operation
/// consumes the aggregate and returns the next snapshot, and every applied
/// event id must be the direct successor of `last_event_id`. A mismatch is a
/// consistency bug, not user input, and fails the whole command or replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Books {
    pub book_id: BookId,
    pub buy_limit_book: LimitBook,
    pub sell_limit_book: LimitBook,
    pub business_date: NaiveDate,
    pub trading_statuses: TradingStatuses,
    pub last_event_id: EventId,
}

impl Books {
    /// An empty aggregate awaiting its creation event. The placeholder
    /// business date and statuses are replaced when `BooksCreatedEvent`
    /// plays.
    pub fn new(book_id: BookId) -> Self {
        Self {
            book_id,
            buy_limit_book: LimitBook::new(Side::Buy),
            sell_limit_book: LimitBook::new(Side::Sell),
            business_date: NaiveDate::default(),
            trading_statuses: TradingStatuses::new(TradingStatus::OpenForTrading),
            last_event_id: EventId::new(0),
        }
    }

    pub fn side_book(&self, side: Side) -> &LimitBook {
        match side {
            Side::Buy => &self.buy_limit_book,
            Side::Sell => &self.sell_limit_book,
        }
    }

    /// Asserts that `event_id` is the direct successor of the last applied
    /// event. This is the single point enforcing event-log contiguity.
    pub fn verify_event_id(&self, event_id: EventId) -> Result<EventId, DomainError> {
        if !event_id.is_next_of(self.last_event_id) {
            return Err(DomainError::EventIdOutOfSequence {
                last: self.last_event_id,
                incoming: event_id,
            });
        }
        Ok(event_id)
    }

    /// Advance the sequence counter without touching either book. Used by
    /// events that carry no entry mutation (rejections, quote headers).
    pub fn of_event_id(mut self, event_id: EventId) -> Result<Self, DomainError> {
        self.last_event_id = self.verify_event_id(event_id)?;
        Ok(self)
    }

    /// Add a resting entry, routed by its side. The entry's key id is the
    /// event id being applied.
    pub fn add_book_entry(mut self, entry: BookEntry) -> Result<Self, DomainError> {
        self.last_event_id = self.verify_event_id(entry.key.event_id)?;
        match entry.side {
            Side::Buy => self.buy_limit_book = self.buy_limit_book.add(entry),
            Side::Sell => self.sell_limit_book = self.sell_limit_book.add(entry),
        }
        Ok(self)
    }

    /// Batch-remove the given entries from whichever side book holds them.
    pub fn remove_book_entries(
        mut self,
        event_id: EventId,
        entries: &[BookEntry],
    ) -> Result<Self, DomainError> {
        self.last_event_id = self.verify_event_id(event_id)?;
        for entry in entries {
            match entry.side {
                Side::Buy => self.buy_limit_book = self.buy_limit_book.remove(&entry.key),
                Side::Sell => self.sell_limit_book = self.sell_limit_book.remove(&entry.key),
            }
        }
        Ok(self)
    }

    /// Remove every entry on `side` that satisfies the predicate.
    pub fn remove_entries_where(
        mut self,
        event_id: EventId,
        side: Side,
        predicate: impl Fn(&BookEntry) -> bool,
    ) -> Result<Self, DomainError> {
        self.last_event_id = self.verify_event_id(event_id)?;
        let keys: Vec<BookEntryKey> = self
            .side_book(side)
            .iter()
            .filter(|entry| predicate(entry))
            .map(|entry| entry.key)
            .collect();
        match side {
            Side::Buy => self.buy_limit_book = self.buy_limit_book.remove_all(keys.iter()),
            Side::Sell => self.sell_limit_book = self.sell_limit_book.remove_all(keys.iter()),
        }
        Ok(self)
    }

    /// Apply one traded side's post-trade state to its book. Does not move
    /// the sequence counter; the trade event does that once for both sides.
    pub fn traded(
        mut self,
        side: Side,
        key: &BookEntryKey,
        sizes: EntrySizes,
        status: EntryStatus,
    ) -> Self {
        match side {
            Side::Buy => self.buy_limit_book = self.buy_limit_book.update(key, sizes, status),
            Side::Sell => self.sell_limit_book = self.sell_limit_book.update(key, sizes, status),
        }
        self
    }

    /// Snapshot every entry satisfying the predicate, buy side first, each
    /// side in priority order.
    pub fn find_entries(&self, predicate: impl Fn(&BookEntry) -> bool) -> Vec<BookEntry> {
        self.buy_limit_book
            .iter()
            .chain(self.sell_limit_book.iter())
            .filter(|entry| predicate(entry))
            .cloned()
            .collect()
    }
}
