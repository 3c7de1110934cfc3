//! Catalog availability filtering for selection dropdowns.
//!
//! An entry already chosen elsewhere in the same scope disappears from
//! other rows' dropdowns, but a row always keeps its own current choice
//! selectable (otherwise re-opening a dropdown would hide the very value
//! it displays).

use crate::models::catalog::{Component, Product};

/// Anything with a catalog identity that can be claimed by a line.
pub trait CatalogEntry {
    fn entry_id(&self) -> i64;
}

impl CatalogEntry for Product {
    fn entry_id(&self) -> i64 {
        self.id
    }
}

impl CatalogEntry for Component {
    fn entry_id(&self) -> i64 {
        self.id
    }
}

/// Entries not claimed at any position other than `current_index`.
///
/// Pass `current_index = None` for the "can another line be added?" check,
/// where no position is exempt.
pub fn available<'a, T: CatalogEntry>(
    catalogue: &'a [T],
    assigned: &[Option<i64>],
    current_index: Option<usize>,
) -> Vec<&'a T> {
    catalogue
        .iter()
        .filter(|entry| is_available(entry.entry_id(), assigned, current_index))
        .collect()
}

/// True when adding one more line at this scope still has a candidate.
pub fn can_add<T: CatalogEntry>(catalogue: &[T], assigned: &[Option<i64>]) -> bool {
    !available(catalogue, assigned, None).is_empty()
}

fn is_available(id: i64, assigned: &[Option<i64>], current_index: Option<usize>) -> bool {
    // Self-inclusion wins outright, even if the same id somehow sits in
    // another row too (duplicates are preventable, not rejected).
    if let Some(current) = current_index {
        if assigned.get(current).copied().flatten() == Some(id) {
            return true;
        }
    }
    !assigned
        .iter()
        .enumerate()
        .any(|(position, slot)| Some(position) != current_index && *slot == Some(id))
}
