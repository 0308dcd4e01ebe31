// ============================================================================
// Domain Errors
// ============================================================================

use super::books::BookId;
use super::event_id::EventId;
use thiserror::Error;

/// Fatal invariant violations.
///
/// These indicate a caller bug or a corrupted event log, never bad user
/// input: business-level rejections are events
/// ([`OrderRejectedEvent`](crate::events::OrderRejectedEvent),
/// [`MassQuoteRejectedEvent`](crate::events::MassQuoteRejectedEvent)), not
/// errors. A `DomainError` aborts the offending command or replay; no local
/// recovery is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("event {incoming} is not the next expected event id after {last}")]
    EventIdOutOfSequence { last: EventId, incoming: EventId },

    #[error("books {0} not found")]
    BooksNotFound(BookId),

    #[error("books {0} already exists")]
    BooksAlreadyExists(BookId),

    #[error("cannot trade {size} against available size {available}")]
    TradeExceedsAvailable { size: u64, available: u64 },

    #[error("cannot amend total size to {new_total}: {executed} already traded or cancelled")]
    AmendBelowExecuted { new_total: u64, executed: u64 },

    #[error("cannot match two entries without a price")]
    NoPriceToTradeAt,
}
