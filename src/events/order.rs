// ============================================================================
// Order Events
// ============================================================================

use crate::domain::{
    BookEntry, BookEntryKey, BookId, Books, Client, ClientRequestId, DomainError, EntrySizes,
    EntryStatus, EntryType, EventId, Side, TimeInForce, Transaction,
};
use crate::engine::match_and_finalise;
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why an order was turned away. Modelled on the FIX order-reject reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderRejectReason {
    BrokerExchangeOption,
    UnknownSymbol,
    ExchangeClosed,
    UnknownOrder,
    DuplicateOrder,
    UnsupportedOrderCharacteristic,
    IncorrectQuantity,
    UnknownAccounts,
    Other,
}

/// An order passed validation and entered the matching pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    pub event_id: EventId,
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub entry_type: EntryType,
    pub side: Side,
    pub sizes: EntrySizes,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub when_happened: DateTime<Utc>,
}

impl OrderPlacedEvent {
    pub fn to_book_entry(&self) -> BookEntry {
        BookEntry {
            key: BookEntryKey {
                price: self.price,
                when_submitted: self.when_happened,
                event_id: self.event_id,
            },
            request_id: self.request_id.clone(),
            who_requested: self.who_requested.clone(),
            is_quote: false,
            entry_type: self.entry_type,
            side: self.side,
            time_in_force: self.time_in_force,
            sizes: self.sizes,
            status: EntryStatus::New,
        }
    }

    /// Advances the sequence, then runs the order through matching and
    /// time-in-force finalisation. All trades, rests and exchange
    /// cancellations come back as side-effect events, regenerated
    /// identically on replay.
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        let books = aggregate.of_event_id(self.event_id)?;
        match_and_finalise(self.to_book_entry(), books)
    }
}

/// An order failed validation. Advances the sequence and changes nothing
/// else; the same invalid command replays to the same rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRejectedEvent {
    pub event_id: EventId,
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub entry_type: EntryType,
    pub side: Side,
    pub size: u64,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub when_happened: DateTime<Utc>,
    pub reason: OrderRejectReason,
    pub text: String,
}

impl OrderRejectedEvent {
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        Ok(Transaction::new(aggregate.of_event_id(self.event_id)?))
    }
}

/// The exchange cancelled what was left of an order (IOC remainder, FOK
/// kill). Carries the post-cancellation sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelledByExchangeEvent {
    pub event_id: EventId,
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub entry_type: EntryType,
    pub side: Side,
    pub sizes: EntrySizes,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub status: EntryStatus,
    pub when_happened: DateTime<Utc>,
}

impl OrderCancelledByExchangeEvent {
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        let who = self.who_requested.clone();
        let request = self.request_id.current.clone();
        Ok(Transaction::new(aggregate.remove_entries_where(
            self.event_id,
            self.side,
            |entry| entry.who_requested == who && entry.request_id.current == request,
        )?))
    }
}
