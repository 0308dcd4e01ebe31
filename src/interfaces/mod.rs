// ============================================================================
// Interfaces Module
// Contracts to the outside: repository and event fan-out
// ============================================================================

mod event_handler;
mod repository;

pub use event_handler::{EventHandler, LoggingEventHandler, NoOpEventHandler};
pub use repository::{BooksRepository, InMemoryBooksRepository};
