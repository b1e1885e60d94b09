use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_skiplist::SkipMap;

use crate::cell::CellId;
use crate::store::{CellMultimap, OrderedCellMultimap, ValueSet};
use crate::IndexValue;

/// Cell multimap ordered by cell id, backed by a concurrent skip list.
///
/// # Characteristics
/// - **Exact lookup**: O(log n) skip list search
/// - **Range scan**: one O(log n) seek, then a linear walk over the cells
///   present in the interval, however wide the interval is
/// - **Lock-free map**: only the per-cell value sets take locks
///
/// # Usage
/// ```rust
/// use geostore::store::{CellMultimap, OrderedCellMultimap, OrderedStore};
/// use geostore::CellId;
///
/// let store = OrderedStore::new();
/// let parent = CellId::root().children()[1];
/// let children = parent.children();
/// store.add(children[0], "a");
/// store.add(children[3], "b");
///
/// let (first, last) = (parent.child_begin(2).unwrap(), parent.child_last(2).unwrap());
/// assert_eq!(store.range(first, last).len(), 2);
/// ```
pub struct OrderedStore<V: IndexValue> {
    cells: SkipMap<CellId, ValueSet<V>>,
    entries: AtomicUsize,
}

impl<V: IndexValue> Default for OrderedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: IndexValue> OrderedStore<V> {
    pub fn new() -> Self {
        OrderedStore {
            cells: SkipMap::new(),
            entries: AtomicUsize::new(0),
        }
    }
}

impl<V: IndexValue> CellMultimap<V> for OrderedStore<V> {
    fn add(&self, cell: CellId, value: V) -> bool {
        // get_or_insert_with publishes exactly one set per cell, even when
        // several writers race on a cell that does not exist yet
        let entry = self.cells.get_or_insert_with(cell, ValueSet::new);
        let inserted = entry.value().insert(value);
        if inserted {
            self.entries.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    fn collect_into(&self, cell: CellId, out: &mut HashSet<V>) {
        if let Some(entry) = self.cells.get(&cell) {
            entry.value().copy_into(out);
        }
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn entry_count(&self) -> usize {
        self.entries.load(Ordering::Relaxed)
    }
}

impl<V: IndexValue> OrderedCellMultimap<V> for OrderedStore<V> {
    fn collect_range_into(&self, first: CellId, last: CellId, out: &mut HashSet<V>) {
        if first > last {
            return;
        }
        for entry in self.cells.range(first..=last) {
            entry.value().copy_into(out);
        }
    }
}
