// ============================================================================
// Place Mass Quote Command
// ============================================================================

use super::merge_rejections;
use crate::domain::{BookId, Books, Client, DomainError, TimeInForce, Transaction};
use crate::events::{
    cancel_existing_quotes, Event, MassQuotePlacedEvent, MassQuoteRejectedEvent, QuoteEntry,
    QuoteRejectReason,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to replace a firm's quotes with a set of two-sided levels.
///
/// The firm's resting quote legs are cancelled first, before validation —
/// they are gone even when the replacement is then rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMassQuoteCommand {
    pub quote_id: String,
    pub who_requested: Client,
    pub book_id: BookId,
    pub time_in_force: TimeInForce,
    pub entries: Vec<QuoteEntry>,
    pub when_requested: DateTime<Utc>,
}

impl PlaceMassQuoteCommand {
    pub fn execute(&self, aggregate: Option<Books>) -> Result<Transaction, DomainError> {
        let books = aggregate.ok_or_else(|| DomainError::BooksNotFound(self.book_id.clone()))?;

        let mut transaction = Transaction::new(books);
        if let Some(cancelled) =
            cancel_existing_quotes(&transaction.aggregate, &self.who_requested, self.when_requested)
        {
            let aggregate = cancelled.play(transaction.aggregate)?.aggregate;
            transaction = Transaction::with_events(aggregate, transaction.events)
                .push(Event::MassQuoteCancelled(cancelled));
        }

        if let Some((reason, text)) = self.validate(&transaction.aggregate) {
            let rejected = self.to_rejected_event(&transaction.aggregate, reason, text);
            let aggregate = rejected.play(transaction.aggregate)?.aggregate;
            return Ok(Transaction::with_events(aggregate, transaction.events)
                .push(Event::MassQuoteRejected(rejected)));
        }

        let placed = self.to_placed_event(&transaction.aggregate);
        let result = placed.play(transaction.aggregate)?;
        let mut transaction = Transaction::with_events(result.aggregate, transaction.events)
            .push(Event::MassQuotePlaced(placed));
        transaction.events.extend(result.events);
        Ok(transaction)
    }

    fn validate(&self, books: &Books) -> Option<(QuoteRejectReason, String)> {
        let rules = [
            self.symbol_must_match(books),
            self.trading_status_allows(books),
            self.sizes_are_correct(),
            self.no_crossed_prices(),
        ];
        merge_rejections(rules, QuoteRejectReason::Other)
    }

    fn symbol_must_match(&self, books: &Books) -> Option<(QuoteRejectReason, String)> {
        (self.book_id != books.book_id).then(|| {
            (
                QuoteRejectReason::UnknownSymbol,
                format!("Unknown book ID : {}", self.book_id),
            )
        })
    }

    fn trading_status_allows(&self, books: &Books) -> Option<(QuoteRejectReason, String)> {
        let status = books.trading_statuses.effective();
        (!status.allows_placing()).then(|| {
            (
                QuoteRejectReason::ExchangeClosed,
                format!("Placing mass quote is currently not allowed : {status}"),
            )
        })
    }

    fn sizes_are_correct(&self) -> Option<(QuoteRejectReason, String)> {
        let non_positive = self
            .entries
            .iter()
            .flat_map(|level| [level.bid, level.offer])
            .flatten()
            .any(|at| at.size == 0);
        non_positive.then(|| {
            (
                QuoteRejectReason::InvalidQuantity,
                "Quote sizes must be positive : 0".to_string(),
            )
        })
    }

    /// No bid may price at or through any offer across all submitted
    /// levels together.
    fn no_crossed_prices(&self) -> Option<(QuoteRejectReason, String)> {
        let lowest_offer = self
            .entries
            .iter()
            .filter_map(|level| level.offer)
            .map(|at| at.price)
            .min()?;
        let highest_bid = self
            .entries
            .iter()
            .filter_map(|level| level.bid)
            .map(|at| at.price)
            .max()?;
        (lowest_offer <= highest_bid).then(|| {
            (
                QuoteRejectReason::InvalidBidAskSpread,
                format!(
                    "Quote prices must not cross within a mass quote: lowestSellPrice={lowest_offer}, highestBuyPrice={highest_bid}"
                ),
            )
        })
    }

    fn to_placed_event(&self, books: &Books) -> MassQuotePlacedEvent {
        MassQuotePlacedEvent {
            event_id: books.last_event_id.next(),
            quote_id: self.quote_id.clone(),
            who_requested: self.who_requested.clone(),
            book_id: self.book_id.clone(),
            time_in_force: self.time_in_force,
            entries: self.entries.clone(),
            when_happened: self.when_requested,
        }
    }

    fn to_rejected_event(
        &self,
        books: &Books,
        reason: QuoteRejectReason,
        text: String,
    ) -> MassQuoteRejectedEvent {
        MassQuoteRejectedEvent {
            event_id: books.last_event_id.next(),
            quote_id: self.quote_id.clone(),
            who_requested: self.who_requested.clone(),
            book_id: self.book_id.clone(),
            time_in_force: self.time_in_force,
            entries: self.entries.clone(),
            when_happened: self.when_requested,
            reason,
            text,
        }
    }
}
