// ============================================================================
// Book Events
// ============================================================================

use crate::domain::{
    BookEntry, BookId, Books, DomainError, EventId, TradingStatuses, Transaction,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The books for an instrument came into existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksCreatedEvent {
    pub event_id: EventId,
    pub book_id: BookId,
    pub business_date: NaiveDate,
    pub trading_statuses: TradingStatuses,
    pub when_happened: DateTime<Utc>,
}

impl BooksCreatedEvent {
    /// Creation replaces whatever placeholder aggregate was passed in; the
    /// sequence starts at this event's id.
    pub fn play(&self, _aggregate: Books) -> Result<Transaction, DomainError> {
        let mut books = Books::new(self.book_id.clone());
        books.business_date = self.business_date;
        books.trading_statuses = self.trading_statuses;
        books.last_event_id = self.event_id;
        Ok(Transaction::new(books))
    }
}

/// An entry started resting on its side of the book. The entry is keyed by
/// this event's id; a matched remainder is re-keyed when it rests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryAddedToBookEvent {
    pub event_id: EventId,
    pub book_id: BookId,
    pub entry: BookEntry,
    pub when_happened: DateTime<Utc>,
}

impl EntryAddedToBookEvent {
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        Ok(Transaction::new(aggregate.add_book_entry(self.entry.clone())?))
    }
}

/// A batch of entries left the book, e.g. a firm's quotes on replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntriesRemovedFromBookEvent {
    pub event_id: EventId,
    pub book_id: BookId,
    pub entries: Vec<BookEntry>,
    pub when_happened: DateTime<Utc>,
}

impl EntriesRemovedFromBookEvent {
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        Ok(Transaction::new(
            aggregate.remove_book_entries(self.event_id, &self.entries)?,
        ))
    }
}
