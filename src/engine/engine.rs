// ============================================================================
// Matching Engine Facade
// Serialized command execution against the repository
// ============================================================================

use crate::commands::{CreateBooksCommand, PlaceMassQuoteCommand, PlaceOrderCommand};
use crate::domain::{BookId, Books, DomainError, Transaction};
use crate::events::{replay, Event};
use crate::interfaces::{BooksRepository, EventHandler};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Drives commands through the pure core: fetch the current aggregate,
/// execute, persist the result, then hand the emitted events downstream.
///
/// Commands against the same book are serialized through a per-book lock so
/// that exactly one command at a time claims the next sequence number;
/// different books proceed in parallel with no shared state.
pub struct MatchingEngine {
    repository: Arc<dyn BooksRepository>,
    event_handler: Arc<dyn EventHandler>,
    book_locks: Mutex<HashMap<BookId, Arc<Mutex<()>>>>,
}

impl MatchingEngine {
    pub fn new(repository: Arc<dyn BooksRepository>, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            repository,
            event_handler,
            book_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn create_books(&self, command: CreateBooksCommand) -> Result<Transaction, DomainError> {
        let lock = self.book_lock(&command.book_id);
        let _guard = lock.lock();

        let existing = self.repository.find(&command.book_id);
        let transaction = command.execute(existing)?;
        tracing::info!(book_id = %command.book_id, "books created");
        self.commit(transaction)
    }

    pub fn place_order(&self, command: PlaceOrderCommand) -> Result<Transaction, DomainError> {
        let lock = self.book_lock(&command.book_id);
        let _guard = lock.lock();

        let existing = self.repository.find(&command.book_id);
        let transaction = command.execute(existing)?;
        tracing::debug!(
            book_id = %command.book_id,
            request_id = %command.request_id.current,
            events = transaction.events.len(),
            "order command executed"
        );
        self.commit(transaction)
    }

    pub fn place_mass_quote(
        &self,
        command: PlaceMassQuoteCommand,
    ) -> Result<Transaction, DomainError> {
        let lock = self.book_lock(&command.book_id);
        let _guard = lock.lock();

        let existing = self.repository.find(&command.book_id);
        let transaction = command.execute(existing)?;
        tracing::debug!(
            book_id = %command.book_id,
            quote_id = %command.quote_id,
            events = transaction.events.len(),
            "mass quote command executed"
        );
        self.commit(transaction)
    }

    /// Rebuild a book from its event log and store the result. The book
    /// must not be live while recovering.
    pub fn recover(&self, book_id: &BookId, events: &[Event]) -> Result<Books, DomainError> {
        let lock = self.book_lock(book_id);
        let _guard = lock.lock();

        let recovered = replay(Books::new(book_id.clone()), events)?;
        tracing::info!(book_id = %book_id, events = events.len(), "books recovered from event log");
        self.repository.create_or_update(recovered.clone());
        Ok(recovered)
    }

    /// Apply, then record, then acknowledge: the aggregate is persisted and
    /// the events are published before the transaction is returned.
    fn commit(&self, transaction: Transaction) -> Result<Transaction, DomainError> {
        self.repository.create_or_update(transaction.aggregate.clone());
        self.event_handler.on_events(&transaction.events);
        Ok(transaction)
    }

    fn book_lock(&self, book_id: &BookId) -> Arc<Mutex<()>> {
        let mut locks = self.book_locks.lock();
        Arc::clone(locks.entry(book_id.clone()).or_default())
    }
}
