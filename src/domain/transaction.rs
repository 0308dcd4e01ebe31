// ============================================================================
// Transaction
// ============================================================================

use super::books::Books;
use crate::events::Event;
use smallvec::SmallVec;

/// Per-transaction event storage. Most transactions carry a handful of
/// events, so they stay inline.
pub type EventVec = SmallVec<[Event; 4]>;

/// The unit of work produced by executing one command: the new aggregate
/// state plus every event that must be durably appended, in the exact order
/// they must be replayed. No change reaches the aggregate other than by an
/// event's `play`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub aggregate: Books,
    pub events: EventVec,
}

impl Transaction {
    pub fn new(aggregate: Books) -> Self {
        Self {
            aggregate,
            events: EventVec::new(),
        }
    }

    pub fn with_events(aggregate: Books, events: EventVec) -> Self {
        Self { aggregate, events }
    }

    /// Record one more event against the current aggregate.
    pub fn push(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Append a later transaction: its events follow this one's, and its
    /// aggregate (the newer state) wins.
    pub fn append(mut self, other: Transaction) -> Self {
        self.events.extend(other.events);
        Self {
            aggregate: other.aggregate,
            events: self.events,
        }
    }
}
