// ============================================================================
// Matchbook
// Event-sourced order book matching core
// ============================================================================

//! # Matchbook
//!
//! An event-sourced matching core for an order-book exchange: commands are
//! validated against a per-instrument aggregate, crossing interest matches
//! under price/time/sequence priority, and everything that happened comes
//! back as an ordered, replayable event log — the sole source of truth for
//! book state.
//!
//! ## Properties
//!
//! - **Pure core**: commands and events are pure functions over immutable
//!   aggregate snapshots; all timestamps and identifiers originate from the
//!   request, never from the clock, so replaying a log always reconstructs
//!   the exact same book.
//! - **Strict sequencing**: every event carries the next sequence number at
//!   its point of application; a gap is a fatal error, not a warning.
//! - **Wash-trade prevention**: same-owner interest never crosses, and
//!   same-firm interest with an unprovable owner is skipped too.
//! - **Single writer per book**: the facade serializes commands per book;
//!   different books are embarrassingly parallel.
//!
//! ## Example
//!
//! ```rust
//! use matchbook::prelude::*;
//! use matchbook::numeric::Price;
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use std::sync::Arc;
//!
//! let engine = MatchingEngine::new(
//!     Arc::new(InMemoryBooksRepository::new()),
//!     Arc::new(NoOpEventHandler),
//! );
//!
//! engine
//!     .create_books(CreateBooksCommand {
//!         book_id: BookId::new("INST-1"),
//!         business_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!         default_trading_status: TradingStatus::OpenForTrading,
//!         when_requested: Utc.timestamp_opt(0, 0).unwrap(),
//!     })
//!     .unwrap();
//!
//! let transaction = engine
//!     .place_order(PlaceOrderCommand {
//!         request_id: ClientRequestId::new("order-1"),
//!         who_requested: Client::new("firm1", Some("client1".into())),
//!         book_id: BookId::new("INST-1"),
//!         entry_type: EntryType::Limit,
//!         side: Side::Buy,
//!         size: 10,
//!         price: Some(Price::new(1500).unwrap()),
//!         time_in_force: TimeInForce::GoodTillCancel,
//!         when_requested: Utc.timestamp_opt(1, 0).unwrap(),
//!     })
//!     .unwrap();
//!
//! // Placed, then rested on the empty book
//! assert_eq!(transaction.events.len(), 2);
//! assert_eq!(transaction.aggregate.buy_limit_book.len(), 1);
//! ```

pub mod commands;
pub mod domain;
pub mod engine;
pub mod events;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::commands::{CreateBooksCommand, PlaceMassQuoteCommand, PlaceOrderCommand};
    pub use crate::domain::{
        BookEntry, BookEntryKey, BookId, Books, Client, ClientRequestId, DomainError, EntrySizes,
        EntryStatus, EntryType, EventId, LimitBook, Side, TimeInForce, TradingStatus,
        TradingStatuses, Transaction,
    };
    pub use crate::engine::{match_and_finalise, match_entry, MatchResult, MatchingEngine};
    pub use crate::events::{
        replay, BooksCreatedEvent, EntriesRemovedFromBookEvent, EntryAddedToBookEvent, Event,
        MassQuoteCancelledEvent, MassQuotePlacedEvent, MassQuoteRejectedEvent,
        OrderCancelledByExchangeEvent, OrderPlacedEvent, OrderRejectReason, OrderRejectedEvent,
        QuoteEntry, QuoteRejectReason, TradeEvent, TradeSideEntry,
    };
    pub use crate::interfaces::{
        BooksRepository, EventHandler, InMemoryBooksRepository, LoggingEventHandler,
        NoOpEventHandler,
    };
}
