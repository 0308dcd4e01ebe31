// ============================================================================
// Domain Module
// Value types, the book entry model, and the Books aggregate
// ============================================================================

mod books;
mod client;
mod entry;
mod errors;
mod event_id;
mod limit_book;
mod transaction;

pub use books::{BookId, Books, TradingStatus, TradingStatuses};
pub use client::{Client, ClientRequestId};
pub use entry::{
    BookEntry, BookEntryKey, EntrySizes, EntryStatus, EntryType, PriorityKey, Side, TimeInForce,
};
pub use errors::DomainError;
pub use event_id::EventId;
pub use limit_book::LimitBook;
pub use transaction::{EventVec, Transaction};
