// ============================================================================
// Mass Quote Events
// ============================================================================

use crate::domain::{
    BookEntry, BookEntryKey, BookId, Books, Client, ClientRequestId, DomainError, EntrySizes,
    EntryStatus, EntryType, EventId, EventVec, Side, TimeInForce, Transaction,
};
use crate::engine::match_and_finalise;
use crate::numeric::SizeAtPrice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a mass quote was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteRejectReason {
    UnknownSymbol,
    ExchangeClosed,
    DuplicateQuote,
    InvalidBidAskSpread,
    InvalidPrice,
    InvalidQuantity,
    NotAuthorised,
    Other,
}

/// One two-sided level of a mass quote. Either side may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEntry {
    pub quote_entry_id: String,
    pub quote_set_id: String,
    pub bid: Option<SizeAtPrice>,
    pub offer: Option<SizeAtPrice>,
}

impl QuoteEntry {
    fn leg(
        &self,
        side: Side,
        at: SizeAtPrice,
        quote_id: &str,
        who_requested: &Client,
        time_in_force: TimeInForce,
        when_happened: DateTime<Utc>,
        event_id: EventId,
    ) -> BookEntry {
        BookEntry {
            key: BookEntryKey {
                price: Some(at.price),
                when_submitted: when_happened,
                event_id,
            },
            request_id: ClientRequestId::with_parent(self.quote_entry_id.clone(), quote_id),
            who_requested: who_requested.clone(),
            is_quote: true,
            entry_type: EntryType::Limit,
            side,
            time_in_force,
            sizes: EntrySizes::new(at.size),
            status: EntryStatus::New,
        }
    }
}

/// A mass quote passed validation. This is the header: playing it advances
/// the sequence, then runs every leg through matching and finalisation,
/// level by level in submitted order, bid before offer within a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassQuotePlacedEvent {
    pub event_id: EventId,
    pub quote_id: String,
    pub who_requested: Client,
    pub book_id: BookId,
    pub time_in_force: TimeInForce,
    pub entries: Vec<QuoteEntry>,
    pub when_happened: DateTime<Utc>,
}

impl MassQuotePlacedEvent {
    /// The quote legs as aggressor entries, initially keyed by this event's
    /// id; a leg that rests is re-keyed by its `EntryAddedToBookEvent`.
    pub fn book_entries(&self) -> Vec<BookEntry> {
        let mut legs = Vec::new();
        for level in &self.entries {
            if let Some(bid) = level.bid {
                legs.push(level.leg(
                    Side::Buy,
                    bid,
                    &self.quote_id,
                    &self.who_requested,
                    self.time_in_force,
                    self.when_happened,
                    self.event_id,
                ));
            }
            if let Some(offer) = level.offer {
                legs.push(level.leg(
                    Side::Sell,
                    offer,
                    &self.quote_id,
                    &self.who_requested,
                    self.time_in_force,
                    self.when_happened,
                    self.event_id,
                ));
            }
        }
        legs
    }

    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        let mut books = aggregate.of_event_id(self.event_id)?;
        let mut events = EventVec::new();
        for leg in self.book_entries() {
            let result = match_and_finalise(leg, books)?;
            books = result.aggregate;
            events.extend(result.events);
        }
        Ok(Transaction::with_events(books, events))
    }
}

/// A mass quote failed validation. The firm's previous quotes are already
/// gone by this point — cancellation precedes validation — so this only
/// advances the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassQuoteRejectedEvent {
    pub event_id: EventId,
    pub quote_id: String,
    pub who_requested: Client,
    pub book_id: BookId,
    pub time_in_force: TimeInForce,
    pub entries: Vec<QuoteEntry>,
    pub when_happened: DateTime<Utc>,
    pub reason: QuoteRejectReason,
    pub text: String,
}

impl MassQuoteRejectedEvent {
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        Ok(Transaction::new(aggregate.of_event_id(self.event_id)?))
    }
}

/// Every resting quote leg of one firm was cancelled, listing each cancelled
/// leg with its cancelled-size delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassQuoteCancelledEvent {
    pub event_id: EventId,
    pub book_id: BookId,
    pub entries: Vec<BookEntry>,
    pub who_requested: Client,
    pub when_happened: DateTime<Utc>,
}

impl MassQuoteCancelledEvent {
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        Ok(Transaction::new(
            aggregate.remove_book_entries(self.event_id, &self.entries)?,
        ))
    }
}

/// Cancel a firm's resting quote legs ahead of a replace or rejection.
/// Returns `None` when the firm has nothing resting.
pub fn cancel_existing_quotes(
    books: &Books,
    who_requested: &Client,
    when_happened: DateTime<Utc>,
) -> Option<MassQuoteCancelledEvent> {
    let resting =
        books.find_entries(|entry| entry.is_quote && entry.who_requested == *who_requested);
    if resting.is_empty() {
        return None;
    }
    Some(MassQuoteCancelledEvent {
        event_id: books.last_event_id.next(),
        book_id: books.book_id.clone(),
        entries: resting.iter().map(BookEntry::cancelled).collect(),
        who_requested: who_requested.clone(),
        when_happened,
    })
}
