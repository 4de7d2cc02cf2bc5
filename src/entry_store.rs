//! EntryStore: arena of chain nodes backed by a generational slot map.
//!
//! The table never allocates nodes individually; it asks the store for a
//! slot and links slots together through their `EntryKey`s.

use core::ops::{Index, IndexMut};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a node in an [`EntryStore`]; used as a chain link.
    pub(crate) struct EntryKey;
}

/// One chained entry. Sets use `P = ()`, so no value slot exists for them.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, P> {
    pub(crate) next: Option<EntryKey>,
    pub(crate) hash: u32,
    pub(crate) key: K,
    pub(crate) payload: P,
}

#[derive(Debug)]
pub(crate) struct EntryStore<K, P> {
    slots: SlotMap<EntryKey, Node<K, P>>,
}

impl<K, P> EntryStore<K, P> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K, P>) -> EntryKey {
        self.slots.insert(node)
    }

    pub(crate) fn free(&mut self, key: EntryKey) -> Option<Node<K, P>> {
        self.slots.remove(key)
    }

    /// Drops every node and releases the backing memory, keeping room for
    /// `reserve` nodes.
    pub(crate) fn clear(&mut self, reserve: usize) {
        self.slots = SlotMap::with_capacity_and_key(reserve);
    }

    pub(crate) fn count(&self) -> usize {
        self.slots.len()
    }

    /// Arena-order walk; used for rehashing, where chain order is rebuilt anyway.
    pub(crate) fn iter_mut(&mut self) -> slotmap::basic::IterMut<'_, EntryKey, Node<K, P>> {
        self.slots.iter_mut()
    }

    pub(crate) fn values_mut(&mut self) -> slotmap::basic::ValuesMut<'_, EntryKey, Node<K, P>> {
        self.slots.values_mut()
    }

    pub(crate) fn into_nodes(self) -> slotmap::basic::IntoIter<EntryKey, Node<K, P>> {
        self.slots.into_iter()
    }
}

impl<K, P> Index<EntryKey> for EntryStore<K, P> {
    type Output = Node<K, P>;

    #[inline]
    fn index(&self, key: EntryKey) -> &Node<K, P> {
        &self.slots[key]
    }
}

impl<K, P> IndexMut<EntryKey> for EntryStore<K, P> {
    #[inline]
    fn index_mut(&mut self, key: EntryKey) -> &mut Node<K, P> {
        &mut self.slots[key]
    }
}
