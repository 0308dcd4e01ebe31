// ============================================================================
// Event Handler Interface
// ============================================================================

use crate::events::Event;

/// Downstream consumer of committed events: persistence of the event log,
/// market data, notifications. Handlers see events in emission order, after
/// the aggregate has been stored.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &Event);

    /// Batch handler; the default forwards one by one.
    fn on_events(&self, events: &[Event]) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: &Event) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: &Event) {
        tracing::debug!(
            book_id = %event.book_id(),
            event_id = %event.event_id(),
            "matching engine event: {event:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookId, EventId, TradingStatus, TradingStatuses};
    use crate::events::BooksCreatedEvent;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_noop_handler_accepts_events() {
        let handler = NoOpEventHandler;
        handler.on_events(&[Event::BooksCreated(BooksCreatedEvent {
            event_id: EventId::new(0),
            book_id: BookId::new("book"),
            business_date: NaiveDate::from_ymd_opt(2020, 2, 3).unwrap(),
            trading_statuses: TradingStatuses::new(TradingStatus::OpenForTrading),
            when_happened: Utc.timestamp_opt(0, 0).unwrap(),
        })]);
    }
}
