// ============================================================================
// Books Repository
// ============================================================================

use crate::domain::{BookId, Books, DomainError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Keyed store for aggregates. The core fetches the current state before
/// validating a command and persists the transaction's aggregate after;
/// durability of the event log itself lives with the caller.
pub trait BooksRepository: Send + Sync {
    /// The aggregate, if present.
    fn find(&self, book_id: &BookId) -> Option<Books>;

    /// The aggregate, which is expected to be present.
    fn read(&self, book_id: &BookId) -> Result<Books, DomainError>;

    /// Store the aggregate unless one already exists under its id. Returns
    /// true if it was stored.
    fn create_if_absent(&self, books: Books) -> bool;

    /// Store the aggregate, overwriting any existing one.
    fn create_or_update(&self, books: Books);

    /// Overwrite only if an aggregate already exists under the id. Returns
    /// true if it did.
    fn update_if_present(&self, books: Books) -> bool;

    /// Remove and return the aggregate, if present.
    fn delete(&self, book_id: &BookId) -> Option<Books>;
}

/// In-memory repository for tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryBooksRepository {
    delegate: RwLock<HashMap<BookId, Books>>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BooksRepository for InMemoryBooksRepository {
    fn find(&self, book_id: &BookId) -> Option<Books> {
        self.delegate.read().get(book_id).cloned()
    }

    fn read(&self, book_id: &BookId) -> Result<Books, DomainError> {
        self.find(book_id)
            .ok_or_else(|| DomainError::BooksNotFound(book_id.clone()))
    }

    fn create_if_absent(&self, books: Books) -> bool {
        let mut map = self.delegate.write();
        match map.entry(books.book_id.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(books);
                true
            },
        }
    }

    fn create_or_update(&self, books: Books) {
        self.delegate.write().insert(books.book_id.clone(), books);
    }

    fn update_if_present(&self, books: Books) -> bool {
        let mut map = self.delegate.write();
        match map.get_mut(&books.book_id) {
            Some(slot) => {
                *slot = books;
                true
            },
            None => false,
        }
    }

    fn delete(&self, book_id: &BookId) -> Option<Books> {
        self.delegate.write().remove(book_id)
    }
}
