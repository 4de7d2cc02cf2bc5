//! Iterators over a `ChainTable`.

use crate::entry_store::{EntryKey, EntryStore, Node};
use core::iter::FusedIterator;

/// Single-pass cursor over the live entries of a table, bucket by bucket.
///
/// Yields exactly `len()` items. No order is guaranteed beyond each live
/// entry appearing once.
pub struct Iter<'a, K, P> {
    buckets: &'a [Option<EntryKey>],
    store: &'a EntryStore<K, P>,
    bucket: usize,
    current: Option<EntryKey>,
    remaining: usize,
}

impl<'a, K, P> Iter<'a, K, P> {
    pub(crate) fn new(
        buckets: &'a [Option<EntryKey>],
        store: &'a EntryStore<K, P>,
        len: usize,
    ) -> Self {
        let mut it = Self {
            buckets,
            store,
            bucket: 0,
            current: None,
            remaining: len,
        };
        if len > 0 {
            it.current = buckets.first().copied().flatten();
            it.skip_empty();
        }
        it
    }

    /// Moves forward to the next non-empty bucket if the current chain ended.
    fn skip_empty(&mut self) {
        while self.current.is_none() {
            self.bucket += 1;
            match self.buckets.get(self.bucket) {
                Some(head) => self.current = *head,
                None => break,
            }
        }
    }

    /// True once every entry has been visited.
    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }

    pub(crate) fn next_node(&mut self) -> Option<&'a Node<K, P>> {
        let slot = self.current?;
        let node = &self.store[slot];
        self.current = node.next;
        self.skip_empty();
        self.remaining -= 1;
        Some(node)
    }
}

impl<'a, K, P> Iterator for Iter<'a, K, P> {
    type Item = (&'a K, &'a P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().map(|node| (&node.key, &node.payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, P> ExactSizeIterator for Iter<'_, K, P> {}
impl<K, P> FusedIterator for Iter<'_, K, P> {}

impl<K, P> Clone for Iter<'_, K, P> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            store: self.store,
            bucket: self.bucket,
            current: self.current,
            remaining: self.remaining,
        }
    }
}

/// Node-level walk used by the set operations; carries cached hashes.
pub(crate) struct Nodes<'a, K, P>(pub(crate) Iter<'a, K, P>);

impl<'a, K, P> Iterator for Nodes<'a, K, P> {
    type Item = &'a Node<K, P>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next_node()
    }
}

/// Iterator over entries with mutable payloads, in arena order.
pub struct IterMut<'a, K, P> {
    pub(crate) it: slotmap::basic::ValuesMut<'a, EntryKey, Node<K, P>>,
}

impl<'a, K, P> Iterator for IterMut<'a, K, P> {
    type Item = (&'a K, &'a mut P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|node| (&node.key, &mut node.payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Owning iterator over entries moved out of a table.
pub struct IntoIter<K, P> {
    pub(crate) it: slotmap::basic::IntoIter<EntryKey, Node<K, P>>,
}

impl<K, P> Iterator for IntoIter<K, P> {
    type Item = (K, P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, node)| (node.key, node.payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}
