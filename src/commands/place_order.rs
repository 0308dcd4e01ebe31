// ============================================================================
// Place Order Command
// ============================================================================

use super::merge_rejections;
use crate::domain::{
    BookId, Books, Client, ClientRequestId, DomainError, EntrySizes, EntryType, Side, TimeInForce,
    Transaction,
};
use crate::events::{Event, OrderPlacedEvent, OrderRejectReason, OrderRejectedEvent};
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to place one order on a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderCommand {
    pub request_id: ClientRequestId,
    pub who_requested: Client,
    pub book_id: BookId,
    pub entry_type: EntryType,
    pub side: Side,
    pub size: u64,
    pub price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub when_requested: DateTime<Utc>,
}

impl PlaceOrderCommand {
    /// Validate against the current aggregate, then either record a
    /// rejection (which only advances the sequence) or place the order and
    /// run it through matching and finalisation.
    pub fn execute(&self, aggregate: Option<Books>) -> Result<Transaction, DomainError> {
        let books = aggregate.ok_or_else(|| DomainError::BooksNotFound(self.book_id.clone()))?;

        if let Some((reason, text)) = self.validate(&books) {
            let rejected = self.to_rejected_event(&books, reason, text);
            let result = rejected.play(books)?;
            return Ok(Transaction::new(result.aggregate).push(Event::OrderRejected(rejected)));
        }

        let placed = self.to_placed_event(&books);
        let result = placed.play(books)?;
        let mut transaction = Transaction::new(result.aggregate).push(Event::OrderPlaced(placed));
        transaction.events.extend(result.events);
        Ok(transaction)
    }

    /// Run every rule and merge the failures into one rejection: a shared
    /// reason survives, disagreeing reasons collapse to `Other`, and the
    /// texts are joined.
    fn validate(&self, books: &Books) -> Option<(OrderRejectReason, String)> {
        let rules = [
            self.symbol_must_match(books),
            self.trading_status_allows(books),
            self.sizes_are_correct(),
            self.price_present_based_on_entry_type(),
            self.valid_entry_type_time_in_force_combo(),
        ];
        merge_rejections(rules, OrderRejectReason::Other)
    }

    fn symbol_must_match(&self, books: &Books) -> Option<(OrderRejectReason, String)> {
        (self.book_id != books.book_id).then(|| {
            (
                OrderRejectReason::UnknownSymbol,
                format!("Unknown book ID : {}", self.book_id),
            )
        })
    }

    fn trading_status_allows(&self, books: &Books) -> Option<(OrderRejectReason, String)> {
        let status = books.trading_statuses.effective();
        (!status.allows_placing()).then(|| {
            (
                OrderRejectReason::ExchangeClosed,
                format!("Placing orders is currently not allowed : {status}"),
            )
        })
    }

    fn sizes_are_correct(&self) -> Option<(OrderRejectReason, String)> {
        (self.size == 0).then(|| {
            (
                OrderRejectReason::IncorrectQuantity,
                format!("Order sizes must be positive : {}", self.size),
            )
        })
    }

    fn price_present_based_on_entry_type(&self) -> Option<(OrderRejectReason, String)> {
        (self.entry_type.price_required() != self.price.is_some()).then(|| {
            (
                OrderRejectReason::UnsupportedOrderCharacteristic,
                format!(
                    "Price must be {} for {:?} order",
                    if self.entry_type.price_required() { "present" } else { "absent" },
                    self.entry_type
                ),
            )
        })
    }

    fn valid_entry_type_time_in_force_combo(&self) -> Option<(OrderRejectReason, String)> {
        (!TimeInForce::valid_combo(self.entry_type, self.time_in_force)).then(|| {
            (
                OrderRejectReason::UnsupportedOrderCharacteristic,
                format!("{:?} {:?} is not supported", self.entry_type, self.time_in_force),
            )
        })
    }

    fn to_placed_event(&self, books: &Books) -> OrderPlacedEvent {
        OrderPlacedEvent {
            event_id: books.last_event_id.next(),
            request_id: self.request_id.clone(),
            who_requested: self.who_requested.clone(),
            book_id: self.book_id.clone(),
            entry_type: self.entry_type,
            side: self.side,
            sizes: EntrySizes::new(self.size),
            price: self.price,
            time_in_force: self.time_in_force,
            when_happened: self.when_requested,
        }
    }

    fn to_rejected_event(
        &self,
        books: &Books,
        reason: OrderRejectReason,
        text: String,
    ) -> OrderRejectedEvent {
        OrderRejectedEvent {
            event_id: books.last_event_id.next(),
            request_id: self.request_id.clone(),
            who_requested: self.who_requested.clone(),
            book_id: self.book_id.clone(),
            entry_type: self.entry_type,
            side: self.side,
            size: self.size,
            price: self.price,
            time_in_force: self.time_in_force,
            when_happened: self.when_requested,
            reason,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradingStatus;
    use chrono::TimeZone;

    fn books() -> Books {
        Books::new(BookId::new("book"))
    }

    fn command() -> PlaceOrderCommand {
        PlaceOrderCommand {
            request_id: ClientRequestId::new("req1"),
            who_requested: Client::new("firm1", Some("client1".into())),
            book_id: BookId::new("book"),
            entry_type: EntryType::Limit,
            side: Side::Buy,
            size: 10,
            price: Some(Price::new(15).unwrap()),
            time_in_force: TimeInForce::GoodTillCancel,
            when_requested: Utc.timestamp_opt(1, 0).unwrap(),
        }
    }

    fn rejection(transaction: &Transaction) -> &OrderRejectedEvent {
        match &transaction.events[0] {
            Event::OrderRejected(event) => event,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_books_is_a_fatal_error() {
        assert_eq!(
            command().execute(None),
            Err(DomainError::BooksNotFound(BookId::new("book")))
        );
    }

    #[test]
    fn test_accepted_order_places_then_rests() {
        let transaction = command().execute(Some(books())).unwrap();

        let kinds: Vec<&str> = transaction
            .events
            .iter()
            .map(|event| match event {
                Event::OrderPlaced(_) => "placed",
                Event::EntryAddedToBook(_) => "added",
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec!["placed", "added"]);
        assert_eq!(transaction.aggregate.buy_limit_book.len(), 1);
    }

    #[test]
    fn test_zero_size_rejects_with_incorrect_quantity() {
        let transaction = PlaceOrderCommand { size: 0, ..command() }
            .execute(Some(books()))
            .unwrap();

        let rejected = rejection(&transaction);
        assert_eq!(rejected.reason, OrderRejectReason::IncorrectQuantity);
        assert_eq!(rejected.text, "Order sizes must be positive : 0");
        assert_eq!(transaction.aggregate.last_event_id.value(), 1);
        assert!(transaction.aggregate.buy_limit_book.is_empty());
    }

    #[test]
    fn test_market_good_till_cancel_rejects_as_unsupported() {
        let transaction = PlaceOrderCommand {
            entry_type: EntryType::Market,
            price: None,
            time_in_force: TimeInForce::GoodTillCancel,
            ..command()
        }
        .execute(Some(books()))
        .unwrap();

        let rejected = rejection(&transaction);
        assert_eq!(rejected.reason, OrderRejectReason::UnsupportedOrderCharacteristic);
    }

    #[test]
    fn test_limit_without_price_rejects() {
        let transaction = PlaceOrderCommand { price: None, ..command() }
            .execute(Some(books()))
            .unwrap();
        assert_eq!(
            rejection(&transaction).reason,
            OrderRejectReason::UnsupportedOrderCharacteristic
        );
    }

    #[test]
    fn test_market_with_price_rejects() {
        let transaction = PlaceOrderCommand {
            entry_type: EntryType::Market,
            time_in_force: TimeInForce::ImmediateOrCancel,
            ..command()
        }
        .execute(Some(books()))
        .unwrap();
        assert_eq!(
            rejection(&transaction).reason,
            OrderRejectReason::UnsupportedOrderCharacteristic
        );
    }

    #[test]
    fn test_closed_book_rejects_with_exchange_closed() {
        let mut closed = books();
        closed.trading_statuses.manual = Some(TradingStatus::Halted);

        let transaction = command().execute(Some(closed)).unwrap();
        let rejected = rejection(&transaction);
        assert_eq!(rejected.reason, OrderRejectReason::ExchangeClosed);
        assert_eq!(rejected.text, "Placing orders is currently not allowed : Halted");
    }

    #[test]
    fn test_disagreeing_rules_collapse_to_other_with_joined_text() {
        let transaction = PlaceOrderCommand {
            size: 0,
            price: None,
            ..command()
        }
        .execute(Some(books()))
        .unwrap();

        let rejected = rejection(&transaction);
        assert_eq!(rejected.reason, OrderRejectReason::Other);
        assert_eq!(
            rejected.text,
            "Order sizes must be positive : 0; Price must be present for Limit order"
        );
    }

    #[test]
    fn test_wrong_book_id_rejects_with_unknown_symbol() {
        let transaction = PlaceOrderCommand {
            book_id: BookId::new("other"),
            ..command()
        }
        .execute(Some(books()))
        .unwrap();
        assert_eq!(rejection(&transaction).reason, OrderRejectReason::UnknownSymbol);
    }
}
