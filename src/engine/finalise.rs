// ============================================================================
// Time-In-Force Finalisation
// ============================================================================

use super::matching::{
    match_entry, price_has_crossed, same_firm_and_same_firm_client,
    same_firm_but_possible_firm_against_client, trade_price, MatchResult,
};
use crate::domain::{BookEntry, Books, DomainError, EntryStatus, TimeInForce, Transaction};
use crate::events::{EntryAddedToBookEvent, Event, OrderCancelledByExchangeEvent};

/// Run an aggressor through matching, then settle its remainder according to
/// its time in force:
///
/// - `GoodTillCancel`: a positive remainder rests on the book;
/// - `ImmediateOrCancel`: a positive remainder is cancelled by the exchange;
/// - `FillOrKill`: the fillable quantity is checked before any matching.
///   Fully fillable orders match normally (and fill completely); anything
///   less cancels the entire original size with no trade ever emitted.
pub fn match_and_finalise(aggressor: BookEntry, books: Books) -> Result<Transaction, DomainError> {
    if aggressor.time_in_force == TimeInForce::FillOrKill
        && fillable_quantity(&aggressor, &books) < aggressor.sizes.available
    {
        return cancel_by_exchange(aggressor, Transaction::new(books));
    }

    let MatchResult {
        aggressor: remainder,
        transaction,
    } = match_entry(aggressor, books)?;

    match remainder.time_in_force {
        TimeInForce::GoodTillCancel => rest_on_book(remainder, transaction),
        TimeInForce::ImmediateOrCancel | TimeInForce::FillOrKill => {
            if remainder.sizes.available == 0 {
                Ok(transaction)
            } else {
                cancel_by_exchange(remainder, transaction)
            }
        },
    }
}

/// Rest a positive remainder at the back of its price level. The added entry
/// takes the adding event's fresh sequence id as its key id.
fn rest_on_book(remainder: BookEntry, transaction: Transaction) -> Result<Transaction, DomainError> {
    if !remainder.time_in_force.can_stay_on_book(remainder.sizes) {
        return Ok(transaction);
    }

    let event_id = transaction.aggregate.last_event_id.next();
    let entry = remainder.with_event_id(event_id);
    let event = EntryAddedToBookEvent {
        event_id,
        book_id: transaction.aggregate.book_id.clone(),
        when_happened: entry.key.when_submitted,
        entry,
    };

    let Transaction { aggregate, events } = transaction;
    let aggregate = event.play(aggregate)?.aggregate;
    Ok(Transaction::with_events(aggregate, events).push(Event::EntryAddedToBook(event)))
}

/// Cancel whatever the entry still has available, in full.
fn cancel_by_exchange(
    remainder: BookEntry,
    transaction: Transaction,
) -> Result<Transaction, DomainError> {
    let cancelled = remainder.cancelled();
    let event = OrderCancelledByExchangeEvent {
        event_id: transaction.aggregate.last_event_id.next(),
        request_id: cancelled.request_id.clone(),
        who_requested: cancelled.who_requested.clone(),
        book_id: transaction.aggregate.book_id.clone(),
        entry_type: cancelled.entry_type,
        side: cancelled.side,
        sizes: cancelled.sizes,
        price: cancelled.key.price,
        time_in_force: cancelled.time_in_force,
        status: EntryStatus::Cancelled,
        when_happened: cancelled.key.when_submitted,
    };

    let Transaction { aggregate, events } = transaction;
    let aggregate = event.play(aggregate)?.aggregate;
    Ok(Transaction::with_events(aggregate, events).push(Event::OrderCancelledByExchange(event)))
}

/// Total quantity the aggressor could take right now: walk the opposite book
/// in priority order, skip entries this aggressor may never trade with, and
/// stop at the first eligible entry whose price has not crossed (later
/// entries only price worse).
fn fillable_quantity(aggressor: &BookEntry, books: &Books) -> u64 {
    let mut fillable = 0;
    for passive in books.side_book(aggressor.side.opposite()).iter() {
        let eligible = !(same_firm_and_same_firm_client(
            &aggressor.who_requested,
            &passive.who_requested,
        ) || same_firm_but_possible_firm_against_client(
            &aggressor.who_requested,
            &passive.who_requested,
        ) || trade_price(aggressor.key.price, passive.key.price).is_none());

        if !eligible {
            continue;
        }
        if !price_has_crossed(aggressor, passive) {
            break;
        }
        fillable += passive.sizes.available;
        if fillable >= aggressor.sizes.available {
            break;
        }
    }
    fillable
}
