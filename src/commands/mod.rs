// ============================================================================
// Commands Module
// Command entry points and validation
// ============================================================================

mod create_books;
mod mass_quote;
mod place_order;

pub use create_books::CreateBooksCommand;
pub use mass_quote::PlaceMassQuoteCommand;
pub use place_order::PlaceOrderCommand;

/// Complete validation: every rule runs, and the failures merge into one
/// rejection. A reason shared by all failed rules survives; disagreeing
/// reasons collapse to the given fallback. Texts join with `"; "` in rule
/// order.
pub(crate) fn merge_rejections<R, const N: usize>(
    rules: [Option<(R, String)>; N],
    fallback: R,
) -> Option<(R, String)>
where
    R: Copy + PartialEq,
{
    let mut merged: Option<(R, String)> = None;
    for (reason, text) in rules.into_iter().flatten() {
        merged = Some(match merged {
            None => (reason, text),
            Some((previous, mut joined)) => {
                joined.push_str("; ");
                joined.push_str(&text);
                (if previous == reason { reason } else { fallback }, joined)
            },
        });
    }
    merged
}
