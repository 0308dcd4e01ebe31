// ============================================================================
// Matching Algorithm
// Price/time/sequence priority crossing against the opposite book
// ============================================================================

use crate::domain::{
    BookEntry, Books, Client, DomainError, EventVec, LimitBook, Side, Transaction,
};
use crate::events::{Event, TradeEvent, TradeSideEntry};
use crate::numeric::Price;

/// What is left of the aggressor after matching, plus the accumulated
/// transaction (updated books and emitted trade events, in order).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub aggressor: BookEntry,
    pub transaction: Transaction,
}

/// Cross an aggressor against the opposite book until it is exhausted, the
/// book is exhausted, or prices stop crossing.
///
/// The opposite book's iteration order is exactly the matching priority
/// order, so no separate sort happens here. An explicit loop rather than
/// recursion: a large order sweeping many levels must not grow the stack.
pub fn match_entry(aggressor: BookEntry, books: Books) -> Result<MatchResult, DomainError> {
    let mut aggressor = aggressor;
    let mut books = books;
    let mut events = EventVec::new();

    loop {
        if aggressor.sizes.available == 0 {
            break;
        }
        let opposite = books.side_book(aggressor.side.opposite());
        let Some(passive) = find_next_match(&aggressor, opposite) else {
            break;
        };

        let trade_size = trade_size(&aggressor, &passive);
        let trade_price = trade_price(aggressor.key.price, passive.key.price)
            .ok_or(DomainError::NoPriceToTradeAt)?;

        let aggressor_after = aggressor.traded(trade_size)?;
        let passive_after = passive.traded(trade_size)?;

        let trade = TradeEvent {
            event_id: books.last_event_id.next(),
            book_id: books.book_id.clone(),
            size: trade_size,
            price: trade_price,
            when_happened: aggressor.key.when_submitted,
            aggressor: TradeSideEntry::of(&aggressor_after),
            passive: TradeSideEntry::of(&passive_after),
        };

        books = trade.play(books)?.aggregate;
        events.push(Event::Trade(trade));
        aggressor = aggressor_after;
    }

    Ok(MatchResult {
        aggressor,
        transaction: Transaction::with_events(books, events),
    })
}

/// Scan the opposite book in priority order for the first eligible passive
/// entry. Wash-trade candidates are skipped, not terminal; a price that has
/// not crossed is terminal, because later entries only price worse.
pub fn find_next_match(aggressor: &BookEntry, opposite: &LimitBook) -> Option<BookEntry> {
    for passive in opposite.iter() {
        if skip_passive(aggressor, passive) {
            continue;
        }
        return if price_has_crossed(aggressor, passive) {
            Some(passive.clone())
        } else {
            None
        };
    }
    None
}

fn skip_passive(aggressor: &BookEntry, passive: &BookEntry) -> bool {
    same_firm_and_same_firm_client(&aggressor.who_requested, &passive.who_requested)
        || same_firm_but_possible_firm_against_client(
            &aggressor.who_requested,
            &passive.who_requested,
        )
        || trade_price(aggressor.key.price, passive.key.price).is_none()
}

/// Same beneficial owner: same firm and same firm client, where two absent
/// client ids count as equal.
pub fn same_firm_and_same_firm_client(aggressor: &Client, passive: &Client) -> bool {
    aggressor == passive
}

/// Same firm with either side's client id absent: it cannot be proven that
/// this is not a self-trade, so the pair never matches.
pub fn same_firm_but_possible_firm_against_client(aggressor: &Client, passive: &Client) -> bool {
    aggressor.firm_id == passive.firm_id
        && (aggressor.firm_client_id.is_none() || passive.firm_client_id.is_none())
}

/// The passive entry's price wins when present; an unpriced side accepts the
/// other side's price. Two unpriced entries cannot trade.
pub fn trade_price(aggressor: Option<Price>, passive: Option<Price>) -> Option<Price> {
    passive.or(aggressor)
}

/// Whether the aggressor's price is the same or better than the passive's,
/// in the aggressor's favourable direction. Either side being unpriced
/// counts as crossed, provided a trade price exists at all.
pub fn price_has_crossed(aggressor: &BookEntry, passive: &BookEntry) -> bool {
    match (aggressor.key.price, passive.key.price) {
        (Some(aggressor_price), Some(passive_price)) => match aggressor.side {
            Side::Buy => aggressor_price >= passive_price,
            Side::Sell => aggressor_price <= passive_price,
        },
        (aggressor_price, passive_price) => trade_price(aggressor_price, passive_price).is_some(),
    }
}

fn trade_size(aggressor: &BookEntry, passive: &BookEntry) -> u64 {
    aggressor.sizes.available.min(passive.sizes.available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BookEntryKey, BookId, ClientRequestId, EntrySizes, EntryStatus, EntryType, EventId,
        TimeInForce,
    };
    use chrono::{TimeZone, Utc};

    fn entry(
        side: Side,
        price: Option<i64>,
        size: u64,
        event_id: u64,
        client: Client,
    ) -> BookEntry {
        BookEntry {
            key: BookEntryKey {
                price: price.map(|p| Price::new(p).unwrap()),
                when_submitted: Utc.timestamp_opt(event_id as i64, 0).unwrap(),
                event_id: EventId::new(event_id),
            },
            request_id: ClientRequestId::new(format!("req{event_id}")),
            who_requested: client,
            is_quote: false,
            entry_type: if price.is_some() { EntryType::Limit } else { EntryType::Market },
            side,
            time_in_force: TimeInForce::GoodTillCancel,
            sizes: EntrySizes::new(size),
            status: EntryStatus::New,
        }
    }

    fn client(firm: &str, firm_client: Option<&str>) -> Client {
        Client::new(firm, firm_client.map(Into::into))
    }

    fn books_with(entries: Vec<BookEntry>) -> Books {
        let mut books = Books::new(BookId::new("book"));
        for entry in entries {
            books = books.add_book_entry(entry).unwrap();
        }
        books
    }

    #[test]
    fn test_no_match_when_aggressor_has_nothing_available() {
        let books = books_with(vec![entry(
            Side::Sell,
            Some(10),
            5,
            1,
            client("firm1", Some("c1")),
        )]);
        let mut aggressor = entry(Side::Buy, Some(10), 5, 2, client("firm2", Some("c2")));
        aggressor.sizes = EntrySizes::with(0, 5, 0);

        let result = match_entry(aggressor.clone(), books.clone()).unwrap();
        assert_eq!(result.aggressor, aggressor);
        assert_eq!(result.transaction, Transaction::new(books));
    }

    #[test]
    fn test_no_match_when_opposite_book_is_empty() {
        let books = books_with(vec![]).of_event_id(EventId::new(1)).unwrap();
        let aggressor = entry(Side::Buy, Some(10), 5, 2, client("firm1", Some("c1")));

        let result = match_entry(aggressor.clone(), books).unwrap();
        assert_eq!(result.aggressor, aggressor);
        assert!(result.transaction.events.is_empty());
    }

    #[test]
    fn test_stops_at_first_non_crossing_price() {
        let books = books_with(vec![entry(
            Side::Sell,
            Some(35),
            5,
            1,
            client("firm1", Some("c1")),
        )]);
        let aggressor = entry(Side::Buy, Some(30), 5, 2, client("firm2", Some("c2")));

        let result = match_entry(aggressor.clone(), books).unwrap();
        assert_eq!(result.aggressor, aggressor);
        assert!(result.transaction.events.is_empty());
    }

    #[test]
    fn test_sweeps_multiple_levels_in_priority_order() {
        let books = books_with(vec![
            entry(Side::Sell, Some(11), 4, 1, client("firm1", Some("c1"))),
            entry(Side::Sell, Some(10), 3, 2, client("firm1", Some("c2"))),
            entry(Side::Sell, Some(13), 9, 3, client("firm1", Some("c3"))),
        ]);
        let aggressor = entry(Side::Buy, Some(11), 9, 4, client("firm2", Some("c9")));

        let result = match_entry(aggressor, books).unwrap();
        let trades: Vec<(u64, i64)> = result
            .transaction
            .events
            .iter()
            .map(|event| match event {
                Event::Trade(trade) => (trade.size, trade.price.value()),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();

        // Best ask 10 first, then 11; 13 never crosses
        assert_eq!(trades, vec![(3, 10), (4, 11)]);
        assert_eq!(result.aggressor.sizes, EntrySizes::with(2, 7, 0));
        assert_eq!(result.aggressor.status, EntryStatus::PartialFill);
        assert_eq!(result.transaction.aggregate.sell_limit_book.len(), 1);
    }

    #[test]
    fn test_trade_events_take_sequential_ids() {
        let books = books_with(vec![
            entry(Side::Sell, Some(10), 3, 1, client("firm1", Some("c1"))),
            entry(Side::Sell, Some(11), 3, 2, client("firm1", Some("c2"))),
        ]);
        let aggressor = entry(Side::Buy, Some(11), 6, 3, client("firm2", Some("c9")));

        let result = match_entry(aggressor, books).unwrap();
        let ids: Vec<u64> = result
            .transaction
            .events
            .iter()
            .map(|event| event.event_id().value())
            .collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(result.transaction.aggregate.last_event_id, EventId::new(5));
    }

    #[test]
    fn test_same_owner_never_trades_even_when_prices_cross() {
        let owner = client("firm1", Some("c1"));
        let books = books_with(vec![entry(Side::Sell, Some(10), 5, 1, owner.clone())]);
        let aggressor = entry(Side::Buy, Some(10), 5, 2, owner);

        let result = match_entry(aggressor.clone(), books).unwrap();
        assert!(result.transaction.events.is_empty());
        assert_eq!(result.aggressor, aggressor);
    }

    #[test]
    fn test_same_firm_with_missing_client_id_is_skipped_not_matched() {
        let books = books_with(vec![entry(Side::Sell, Some(10), 5, 1, client("firm1", None))]);
        let aggressor = entry(Side::Buy, Some(10), 5, 2, client("firm1", Some("c1")));

        let result = match_entry(aggressor.clone(), books).unwrap();
        assert!(result.transaction.events.is_empty());
    }

    #[test]
    fn test_skips_wash_candidate_and_matches_the_next_in_priority() {
        let books = books_with(vec![
            entry(Side::Sell, Some(10), 5, 1, client("firm1", Some("c1"))),
            entry(Side::Sell, Some(10), 5, 2, client("firm2", Some("c2"))),
        ]);
        let aggressor = entry(Side::Buy, Some(10), 5, 3, client("firm1", Some("c1")));

        let result = match_entry(aggressor, books).unwrap();
        assert_eq!(result.transaction.events.len(), 1);
        let Event::Trade(trade) = &result.transaction.events[0] else {
            panic!("expected a trade");
        };
        assert_eq!(trade.passive.who_requested, client("firm2", Some("c2")));
        // The wash candidate stays on the book untouched
        assert_eq!(result.transaction.aggregate.sell_limit_book.len(), 1);
    }

    #[test]
    fn test_market_aggressor_trades_at_passive_price() {
        let books = books_with(vec![entry(
            Side::Sell,
            Some(42),
            5,
            1,
            client("firm1", Some("c1")),
        )]);
        let aggressor = entry(Side::Buy, None, 5, 2, client("firm2", Some("c2")));

        let result = match_entry(aggressor, books).unwrap();
        let Event::Trade(trade) = &result.transaction.events[0] else {
            panic!("expected a trade");
        };
        assert_eq!(trade.price.value(), 42);
        assert_eq!(result.aggressor.status, EntryStatus::Filled);
    }

    #[test]
    fn test_two_unpriced_entries_cannot_trade() {
        let resting_market = entry(Side::Sell, None, 5, 1, client("firm1", Some("c1")));
        let books = books_with(vec![resting_market]);
        let aggressor = entry(Side::Buy, None, 5, 2, client("firm2", Some("c2")));

        let result = match_entry(aggressor.clone(), books).unwrap();
        assert!(result.transaction.events.is_empty());
        assert_eq!(result.aggressor, aggressor);
    }

    #[test]
    fn test_trade_snapshots_carry_post_trade_sizes() {
        let books = books_with(vec![entry(
            Side::Sell,
            Some(10),
            4,
            1,
            client("firm1", Some("c1")),
        )]);
        let aggressor = entry(Side::Buy, Some(10), 6, 2, client("firm2", Some("c2")));

        let result = match_entry(aggressor, books).unwrap();
        let Event::Trade(trade) = &result.transaction.events[0] else {
            panic!("expected a trade");
        };
        assert_eq!(trade.size, 4);
        assert_eq!(trade.passive.sizes, EntrySizes::with(0, 4, 0));
        assert_eq!(trade.passive.status, EntryStatus::Filled);
        assert_eq!(trade.aggressor.sizes, EntrySizes::with(2, 4, 0));
        assert_eq!(trade.aggressor.status, EntryStatus::PartialFill);
    }
}
