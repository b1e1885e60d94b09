//! Concurrent cell multimaps.
//!
//! Both stores map a [`CellId`] to a growing [`ValueSet`]. They differ only in
//! the outer map: [`OrderedStore`] keeps cells in id order so that every
//! descendant range is one scan, [`FlatStore`] hashes them.
//!
//! # Concurrency
//! - Creating a cell's set and inserting into it is one atomic step, so two
//!   writers racing on a new cell never lose a value.
//! - Readers take snapshots under the set's read lock; they never observe a
//!   set that is being built.
//! - There is no atomicity across cells.

mod flat_store;
mod ordered_store;
mod value_set;

pub use flat_store::FlatStore;
pub use ordered_store::OrderedStore;
pub use value_set::ValueSet;

use std::collections::HashSet;

use crate::cell::CellId;
use crate::IndexValue;

/// Thread-safe mapping from a cell to a set of values.
pub trait CellMultimap<V: IndexValue>: Send + Sync {
    /// Adds `value` to the set of `cell`, creating the set on first use.
    ///
    /// Returns `false` if the pair was already present.
    fn add(&self, cell: CellId, value: V) -> bool;

    /// Snapshot of the values stored under `cell`; empty if none.
    fn get(&self, cell: CellId) -> HashSet<V> {
        let mut values = HashSet::new();
        self.collect_into(cell, &mut values);
        values
    }

    /// Unions the values stored under `cell` into `out`.
    fn collect_into(&self, cell: CellId, out: &mut HashSet<V>);

    /// Number of cells holding at least one value.
    fn cell_count(&self) -> usize;

    /// Number of distinct (cell, value) pairs.
    fn entry_count(&self) -> usize;
}

/// A [`CellMultimap`] that can also answer inclusive id-range queries.
pub trait OrderedCellMultimap<V: IndexValue>: CellMultimap<V> {
    /// Union of the values of every cell with `first <= id <= last`.
    fn range(&self, first: CellId, last: CellId) -> HashSet<V> {
        let mut values = HashSet::new();
        self.collect_range_into(first, last, &mut values);
        values
    }

    /// Unions the values of every cell with `first <= id <= last` into `out`.
    fn collect_range_into(&self, first: CellId, last: CellId, out: &mut HashSet<V>);
}
