//! Pure merge of one entry into an index document
//!
//! No I/O happens here - the engine passes the fetched document in, making
//! the merge semantics easy to unit test.

use crate::index::{Entry, IndexDocument, MergeAction};
use indexmap::IndexMap;

/// Merge `entry` into `category`, keyed by entry name.
///
/// The category is created when missing. The category's sequence is
/// deduplicated by name while merging (last occurrence wins), which also
/// heals duplicate keys left behind by earlier writers. Untouched entries
/// keep their positions, a replaced entry keeps the position of the entry
/// it replaces, and a new entry lands at the end.
pub fn upsert_entry(doc: &mut IndexDocument, category: &str, entry: Entry) -> MergeAction {
    let entries = doc.categories.entry(category.to_string()).or_default();

    // Rebuild through a name-keyed map to enforce key uniqueness.
    let mut by_name: IndexMap<String, Entry> = IndexMap::with_capacity(entries.len() + 1);
    for existing in entries.drain(..) {
        by_name.insert(existing.name.clone(), existing);
    }

    let action = if by_name.contains_key(&entry.name) {
        MergeAction::Updated
    } else {
        MergeAction::Inserted
    };
    by_name.insert(entry.name.clone(), entry);

    *entries = by_name.into_values().collect();
    action
}
