// ============================================================================
// Events Module
// The persisted event vocabulary and replay
// ============================================================================
//
// The ordered event list is the sole source of truth for book state: the
// repository and any downstream reader must round-trip these types
// field-for-field. Primary events are direct responses to commands;
// side-effect events are regenerated when a primary event plays, so replay
// only folds the primary ones.

mod book;
mod order;
mod quote;
mod replay;
mod trade;

pub use book::{BooksCreatedEvent, EntriesRemovedFromBookEvent, EntryAddedToBookEvent};
pub use order::{
    OrderCancelledByExchangeEvent, OrderPlacedEvent, OrderRejectReason, OrderRejectedEvent,
};
pub use quote::{
    cancel_existing_quotes, MassQuoteCancelledEvent, MassQuotePlacedEvent, MassQuoteRejectedEvent,
    QuoteEntry, QuoteRejectReason,
};
pub use replay::replay;
pub use trade::{TradeEvent, TradeSideEntry};

use crate::domain::{BookId, Books, DomainError, EventId, Transaction};
use serde::{Deserialize, Serialize};

/// Everything that can appear in a book's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BooksCreated(BooksCreatedEvent),
    OrderPlaced(OrderPlacedEvent),
    OrderRejected(OrderRejectedEvent),
    OrderCancelledByExchange(OrderCancelledByExchangeEvent),
    EntryAddedToBook(EntryAddedToBookEvent),
    EntriesRemovedFromBook(EntriesRemovedFromBookEvent),
    Trade(TradeEvent),
    MassQuotePlaced(MassQuotePlacedEvent),
    MassQuoteRejected(MassQuoteRejectedEvent),
    MassQuoteCancelled(MassQuoteCancelledEvent),
}

impl Event {
    pub fn event_id(&self) -> EventId {
        match self {
            Event::BooksCreated(event) => event.event_id,
            Event::OrderPlaced(event) => event.event_id,
            Event::OrderRejected(event) => event.event_id,
            Event::OrderCancelledByExchange(event) => event.event_id,
            Event::EntryAddedToBook(event) => event.event_id,
            Event::EntriesRemovedFromBook(event) => event.event_id,
            Event::Trade(event) => event.event_id,
            Event::MassQuotePlaced(event) => event.event_id,
            Event::MassQuoteRejected(event) => event.event_id,
            Event::MassQuoteCancelled(event) => event.event_id,
        }
    }

    pub fn book_id(&self) -> &BookId {
        match self {
            Event::BooksCreated(event) => &event.book_id,
            Event::OrderPlaced(event) => &event.book_id,
            Event::OrderRejected(event) => &event.book_id,
            Event::OrderCancelledByExchange(event) => &event.book_id,
            Event::EntryAddedToBook(event) => &event.book_id,
            Event::EntriesRemovedFromBook(event) => &event.book_id,
            Event::Trade(event) => &event.book_id,
            Event::MassQuotePlaced(event) => &event.book_id,
            Event::MassQuoteRejected(event) => &event.book_id,
            Event::MassQuoteCancelled(event) => &event.book_id,
        }
    }

    /// Primary events respond directly to commands; the rest are generated
    /// while playing a primary event and are skipped on replay.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            Event::BooksCreated(_)
                | Event::OrderPlaced(_)
                | Event::OrderRejected(_)
                | Event::MassQuotePlaced(_)
                | Event::MassQuoteRejected(_)
                | Event::MassQuoteCancelled(_)
        )
    }

    /// Fold this event into the aggregate, returning the next state plus
    /// any regenerated side-effect events.
    pub fn play(&self, aggregate: Books) -> Result<Transaction, DomainError> {
        match self {
            Event::BooksCreated(event) => event.play(aggregate),
            Event::OrderPlaced(event) => event.play(aggregate),
            Event::OrderRejected(event) => event.play(aggregate),
            Event::OrderCancelledByExchange(event) => event.play(aggregate),
            Event::EntryAddedToBook(event) => event.play(aggregate),
            Event::EntriesRemovedFromBook(event) => event.play(aggregate),
            Event::Trade(event) => event.play(aggregate),
            Event::MassQuotePlaced(event) => event.play(aggregate),
            Event::MassQuoteRejected(event) => event.play(aggregate),
            Event::MassQuoteCancelled(event) => event.play(aggregate),
        }
    }
}
