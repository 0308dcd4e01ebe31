// ============================================================================
// Trade Event
// ============================================================================

use crate::domain::{
    BookEntry, BookEntryKey, BookId, Books, Client, ClientRequestId, DomainError, EntrySizes,
    EntryStatus, EntryType, EventId, Side, TimeInForce, Transaction,
};
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A match between an aggressor and a passive entry. Both sides are
/// value-copy snapshots taken after the trade was applied to them, each
/// carrying its own resulting sizes and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub event_id: EventId,
    pub book_id: BookId,
    pub size: u64,
    pub price: Price,
    pub when_happened: DateTime<Utc>,
    pub aggressor: TradeSideEntry,
    pub passive: TradeSideEntry,
}

impl TradeEvent {
    /// Applies the trade: the passive side's book entry is updated or
    /// removed; the aggressor is in flight, so its update is a no-op there.
    pub fn play(&self, books: Books) -> Result<Transaction, DomainError> {
        let books = books.of_event_id(self.event_id)?;
        let books = apply_side(books, &self.aggressor);
        let books = apply_side(books, &self.passive);
        Ok(Transaction::new(books))
    }
}

fn apply_side(books: Books, entry: &TradeSideEntry) -> Books {
    books.traded(entry.side, &entry.book_entry_key(), entry.sizes, entry.status)
}

/// One side of a trade, snapshotted by value. Cross-references into the book
/// are never by pointer; a trade carries everything a downstream reader
/// needs to know about each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSideEntry {
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub is_quote: bool,
    pub entry_type: EntryType,
    pub side: Side,
    pub sizes: EntrySizes,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub when_submitted: DateTime<Utc>,
    pub event_id: EventId,
    pub status: EntryStatus,
}

impl TradeSideEntry {
    /// Snapshot an entry as one side of a trade. The entry is expected to
    /// already reflect the post-trade sizes and status.
    pub fn of(entry: &BookEntry) -> Self {
        Self {
            request_id: entry.request_id.clone(),
            who_requested: entry.who_requested.clone(),
            is_quote: entry.is_quote,
            entry_type: entry.entry_type,
            side: entry.side,
            sizes: entry.sizes,
            price: entry.key.price,
            time_in_force: entry.time_in_force,
            when_submitted: entry.key.when_submitted,
            event_id: entry.key.event_id,
            status: entry.status,
        }
    }

    pub fn book_entry_key(&self) -> BookEntryKey {
        BookEntryKey {
            price: self.price,
            when_submitted: self.when_submitted,
            event_id: self.event_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn resting_sell() -> BookEntry {
        BookEntry {
            key: BookEntryKey {
                price: Some(Price::new(10).unwrap()),
                when_submitted: Utc.timestamp_opt(0, 0).unwrap(),
                event_id: EventId::new(1),
            },
            request_id: ClientRequestId::new("passive"),
            who_requested: Client::new("firm1", Some("client1".into())),
            is_quote: false,
            entry_type: EntryType::Limit,
            side: Side::Sell,
            time_in_force: TimeInForce::GoodTillCancel,
            sizes: EntrySizes::new(4),
            status: EntryStatus::New,
        }
    }

    fn aggressor_buy() -> BookEntry {
        BookEntry {
            key: BookEntryKey {
                price: Some(Price::new(10).unwrap()),
                when_submitted: Utc.timestamp_opt(1, 0).unwrap(),
                event_id: EventId::new(2),
            },
            request_id: ClientRequestId::new("aggressor"),
            who_requested: Client::new("firm2", Some("client2".into())),
            is_quote: false,
            entry_type: EntryType::Limit,
            side: Side::Buy,
            time_in_force: TimeInForce::GoodTillCancel,
            sizes: EntrySizes::new(6),
            status: EntryStatus::New,
        }
    }

    #[test]
    fn test_play_removes_fully_traded_passive_and_skips_in_flight_aggressor() {
        let passive = resting_sell();
        let books = Books::new(BookId::new("book"))
            .add_book_entry(passive.clone())
            .unwrap()
            .of_event_id(EventId::new(2))
            .unwrap();

        let aggressor_after = aggressor_buy().traded(4).unwrap();
        let passive_after = passive.traded(4).unwrap();

        let event = TradeEvent {
            event_id: EventId::new(3),
            book_id: BookId::new("book"),
            size: 4,
            price: Price::new(10).unwrap(),
            when_happened: Utc.timestamp_opt(1, 0).unwrap(),
            aggressor: TradeSideEntry::of(&aggressor_after),
            passive: TradeSideEntry::of(&passive_after),
        };

        let result = event.play(books).unwrap();
        assert!(result.aggregate.sell_limit_book.is_empty());
        assert!(result.aggregate.buy_limit_book.is_empty());
        assert_eq!(result.aggregate.last_event_id, EventId::new(3));
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_play_updates_partially_traded_passive_in_place() {
        let passive = resting_sell();
        let books = Books::new(BookId::new("book"))
            .add_book_entry(passive.clone())
            .unwrap()
            .of_event_id(EventId::new(2))
            .unwrap();

        let aggressor_after = aggressor_buy().traded(3).unwrap();
        let passive_after = passive.traded(3).unwrap();

        let event = TradeEvent {
            event_id: EventId::new(3),
            book_id: BookId::new("book"),
            size: 3,
            price: Price::new(10).unwrap(),
            when_happened: Utc.timestamp_opt(1, 0).unwrap(),
            aggressor: TradeSideEntry::of(&aggressor_after),
            passive: TradeSideEntry::of(&passive_after),
        };

        let result = event.play(books).unwrap();
        let rested = result.aggregate.sell_limit_book.first().unwrap();
        assert_eq!(rested.sizes, EntrySizes::with(1, 3, 0));
        assert_eq!(rested.status, EntryStatus::PartialFill);
    }
}
