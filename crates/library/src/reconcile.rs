//! Matching fetched books against the catalog
//!
//! Books are identified by their exact (title, author) pair. On the catalog
//! side the author lives in `description_text`, and only book-typed items
//! with both fields set take part in matching.

use mediashelf_core::{BookRecord, DedupKey, Item, NewItem};
use std::collections::HashSet;

/// Outcome of matching one batch of fetched records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcilePlan {
    /// Items to create, in the order their records were fetched
    pub to_create: Vec<NewItem>,
    /// Records already present in the catalog
    pub skipped_existing: usize,
    /// Records repeated earlier in the same batch
    pub skipped_duplicates: usize,
}

/// Returns the items to create for records not yet in `existing`
pub fn reconcile(incoming: &[BookRecord], existing: &[Item]) -> Vec<NewItem> {
    reconcile_detailed(incoming, existing).to_create
}

/// Like [`reconcile`], also counting why records were skipped
pub fn reconcile_detailed(incoming: &[BookRecord], existing: &[Item]) -> ReconcilePlan {
    let known: HashSet<DedupKey> = existing
        .iter()
        .filter(|item| item.is_book())
        .filter_map(Item::dedup_key)
        .collect();

    let mut emitted: HashSet<DedupKey> = HashSet::new();
    let mut plan = ReconcilePlan::default();

    for record in incoming {
        let key = record.dedup_key();

        if known.contains(&key) {
            plan.skipped_existing += 1;
        } else if !emitted.insert(key) {
            plan.skipped_duplicates += 1;
        } else {
            plan.to_create.push(NewItem::from_book(record));
        }
    }

    plan
}
