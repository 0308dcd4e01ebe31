// ============================================================================
// Engine Module
// Matching, time-in-force finalisation, and the command facade
// ============================================================================

#[allow(clippy::module_inception)]
mod engine;
mod finalise;
mod matching;

pub use engine::MatchingEngine;
pub use finalise::match_and_finalise;
pub use matching::{
    find_next_match, match_entry, price_has_crossed, same_firm_and_same_firm_client,
    same_firm_but_possible_firm_against_client, trade_price, MatchResult,
};
