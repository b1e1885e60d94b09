use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::cell::CellId;
use crate::store::{CellMultimap, ValueSet};
use crate::IndexValue;

/// Unordered cell multimap backed by a sharded concurrent hash map.
///
/// Supports exact lookups only.
pub struct FlatStore<V: IndexValue> {
    cells: DashMap<CellId, ValueSet<V>>,
    entries: AtomicUsize,
}

impl<V: IndexValue> Default for FlatStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: IndexValue> FlatStore<V> {
    pub fn new() -> Self {
        FlatStore {
            cells: DashMap::new(),
            entries: AtomicUsize::new(0),
        }
    }
}

impl<V: IndexValue> CellMultimap<V> for FlatStore<V> {
    fn add(&self, cell: CellId, value: V) -> bool {
        // Fast path under the shard read lock; the entry API holds the shard
        // write lock across get-or-create and insert.
        let existing = self.cells.get(&cell);
        let inserted = match existing {
            Some(set) => set.insert(value),
            None => self.cells.entry(cell).or_default().insert(value),
        };
        if inserted {
            self.entries.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    fn collect_into(&self, cell: CellId, out: &mut HashSet<V>) {
        if let Some(set) = self.cells.get(&cell) {
            set.copy_into(out);
        }
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn entry_count(&self) -> usize {
        self.entries.load(Ordering::Relaxed)
    }
}
