// ============================================================================
// Replay
// ============================================================================

use super::Event;
use crate::domain::{Books, DomainError};

/// Rebuild an aggregate by folding its event log over an initial state.
///
/// Only primary events are played: side-effect events (trades, rests,
/// exchange cancellations) are regenerated by the primary events' `play`
/// functions, deterministically, from the entries present at replay time.
/// Replaying the same log from the same initial state always yields an
/// identical aggregate.
pub fn replay<'a>(
    initial: Books,
    events: impl IntoIterator<Item = &'a Event>,
) -> Result<Books, DomainError> {
    let mut latest = initial;
    for event in events {
        if event.is_primary() {
            latest = event.play(latest)?.aggregate;
        }
    }
    Ok(latest)
}
