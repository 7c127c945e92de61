//! The catalog index: the normalized, deduplicated item set for a session.

use std::collections::HashMap;

use serde::Serialize;

use super::dedup::{resolve_collision, CollisionOutcome};
use super::types::{Item, ItemKey, ALL_CATEGORIES};

/// Counts returned by [`CatalogIndex::upsert_batch`] for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertStats {
    /// Items inserted under a previously unseen `(category, id)`.
    pub inserted: usize,
    /// Collisions where the incoming adapter outranked the existing entry.
    pub updated: usize,
    /// Collisions where the existing entry was kept.
    pub dropped: usize,
}

impl UpsertStats {
    /// Accumulate another batch's counts into this one.
    pub fn absorb(&mut self, other: UpsertStats) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.dropped += other.dropped;
    }
}

struct Entry {
    rank: u32,
    item: Item,
}

/// Holds the full set of normalized, deduplicated items for one pass.
///
/// Built incrementally by the orchestrator as each adapter's fetch resolves,
/// then handed to consumers as an immutable snapshot. Queries are synchronous
/// and never observe a partially merged state because a pass replaces the
/// whole snapshot rather than mutating it in place.
#[derive(Default)]
pub struct CatalogIndex {
    entries: HashMap<ItemKey, Entry>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch from one adapter into the working set.
    ///
    /// `rank` is the adapter's declared dedupe precedence; higher ranks win
    /// collisions, equal ranks keep the first item seen.
    pub fn upsert_batch(&mut self, items: Vec<Item>, rank: u32) -> UpsertStats {
        let mut stats = UpsertStats::default();

        for item in items {
            match self.entries.get_mut(&item.key()) {
                Some(entry) => {
                    match resolve_collision(&mut entry.item, &mut entry.rank, item, rank) {
                        CollisionOutcome::Replaced => stats.updated += 1,
                        CollisionOutcome::Kept => stats.dropped += 1,
                    }
                }
                None => {
                    self.entries.insert(item.key(), Entry { rank, item });
                    stats.inserted += 1;
                }
            }
        }

        stats
    }

    /// Items matching the category, or all items for [`ALL_CATEGORIES`].
    ///
    /// Ordering is deterministic: case-insensitive sort by name with the id
    /// as tie-break, so consumer lists stay stable across re-renders.
    pub fn by_category(&self, category: &str) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .entries
            .values()
            .map(|e| &e.item)
            .filter(|i| category == ALL_CATEGORIES || i.category == category)
            .collect();
        items.sort_by(|a, b| {
            (a.name.to_lowercase(), &a.id).cmp(&(b.name.to_lowercase(), &b.id))
        });
        items
    }

    /// Case-insensitive substring match against item names.
    ///
    /// An empty term returns the input unchanged, so it composes directly
    /// with [`CatalogIndex::by_category`].
    pub fn search<'a>(&self, term: &str, within: Vec<&'a Item>) -> Vec<&'a Item> {
        if term.is_empty() {
            return within;
        }
        let term = term.to_lowercase();
        within
            .into_iter()
            .filter(|i| i.name.to_lowercase().contains(&term))
            .collect()
    }

    /// All distinct categories present, sorted, preceded by [`ALL_CATEGORIES`].
    ///
    /// Derived on demand, never stored.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .entries
            .values()
            .map(|e| e.item.category.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        cats.insert(0, ALL_CATEGORIES.to_string());
        cats
    }

    /// Identity lookup by `(category, id)`.
    pub fn get(&self, category: &str, id: &str) -> Option<&Item> {
        self.entries
            .get(&(category.to_string(), id.to_string()))
            .map(|e| &e.item)
    }

    /// Number of items in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all items, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entries.values().map(|e| &e.item)
    }
}
