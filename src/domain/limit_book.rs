// ============================================================================
// Limit Book
// One side's priority-ordered entries
// ============================================================================

use super::entry::{BookEntry, BookEntryKey, EntrySizes, EntryStatus, PriorityKey, Side};
use std::collections::BTreeMap;

/// A side's resting entries, ordered by the side-normalised priority key.
///
/// The map's iteration order is the matching/display priority order; the
/// key embeds the full `(price, time, sequence)` priority so insertion never
/// re-sorts. There is no validation here: key uniqueness is guaranteed by
/// event-id uniqueness upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitBook {
    side: Side,
    entries: BTreeMap<PriorityKey, BookEntry>,
}

impl LimitBook {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            entries: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert an entry at its priority position.
    pub fn add(mut self, entry: BookEntry) -> Self {
        self.entries.insert(entry.key.priority(self.side), entry);
        self
    }

    /// Remove the entry with the given key, if present.
    pub fn remove(mut self, key: &BookEntryKey) -> Self {
        self.entries.remove(&key.priority(self.side));
        self
    }

    /// Batch-remove entries, e.g. for mass-quote cancellation.
    pub fn remove_all<'a>(mut self, keys: impl IntoIterator<Item = &'a BookEntryKey>) -> Self {
        for key in keys {
            self.entries.remove(&key.priority(self.side));
        }
        self
    }

    /// Apply a trade to the resting entry with the given key: drop it once
    /// fully traded, otherwise replace its sizes and status. A key that is
    /// not resting (an in-flight aggressor) is left untouched.
    pub fn update(mut self, key: &BookEntryKey, sizes: EntrySizes, status: EntryStatus) -> Self {
        let priority = key.priority(self.side);
        if sizes.available == 0 {
            self.entries.remove(&priority);
        } else if let Some(entry) = self.entries.get_mut(&priority) {
            entry.sizes = sizes;
            entry.status = status;
        }
        self
    }

    /// Entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &BookEntry> {
        self.entries.values()
    }

    pub fn first(&self) -> Option<&BookEntry> {
        self.entries.values().next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
