// ============================================================================
// Create Books Command
// ============================================================================

use crate::domain::{BookId, Books, DomainError, EventId, TradingStatus, TradingStatuses, Transaction};
use crate::events::{BooksCreatedEvent, Event};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Bring a new instrument's books into existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBooksCommand {
    pub book_id: BookId,
    pub business_date: NaiveDate,
    pub default_trading_status: TradingStatus,
    pub when_requested: DateTime<Utc>,
}

impl CreateBooksCommand {
    pub fn execute(&self, aggregate: Option<Books>) -> Result<Transaction, DomainError> {
        if aggregate.is_some() {
            return Err(DomainError::BooksAlreadyExists(self.book_id.clone()));
        }

        let event = BooksCreatedEvent {
            event_id: EventId::new(0),
            book_id: self.book_id.clone(),
            business_date: self.business_date,
            trading_statuses: TradingStatuses::new(self.default_trading_status),
            when_happened: self.when_requested,
        };

        let result = event.play(Books::new(self.book_id.clone()))?;
        Ok(Transaction::new(result.aggregate).push(Event::BooksCreated(event)))
    }
}
