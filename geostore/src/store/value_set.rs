use std::collections::HashSet;

use parking_lot::RwLock;

use crate::IndexValue;

/// The set of values registered under one cell.
///
/// Writers serialize on the set's lock; readers copy members out under the
/// read lock, so a reader either sees a value or does not, never a torn set.
pub struct ValueSet<V: IndexValue> {
    members: RwLock<HashSet<V>>,
}

impl<V: IndexValue> Default for ValueSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: IndexValue> ValueSet<V> {
    pub fn new() -> Self {
        ValueSet {
            members: RwLock::new(HashSet::new()),
        }
    }

    /// Returns `true` if the value was not present.
    pub fn insert(&self, value: V) -> bool {
        self.members.write().insert(value)
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Copies every member into `out`.
    pub fn copy_into(&self, out: &mut HashSet<V>) {
        let members = self.members.read();
        out.extend(members.iter().cloned());
    }
}

impl<V: IndexValue + std::fmt::Debug> std::fmt::Debug for ValueSet<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.members.read().iter()).finish()
    }
}
