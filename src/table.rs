//! ChainTable: the chained hashing engine behind `ChainHashMap` and `ChainHashSet`.
//!
//! Entries live in an [`EntryStore`] arena and are linked into per-bucket
//! chains through their arena keys. The bucket count always comes from
//! [`SIZE_CLASSES`](crate::size_class::SIZE_CLASSES); crossing the grow or
//! shrink threshold moves the table one class at a time and redistributes
//! every entry by its cached hash.

use crate::config::{TableConfig, TableFlags};
use crate::entry_store::{EntryKey, EntryStore, Node};
use crate::error::InsertError;
use crate::iter::{IntoIter, Iter, IterMut, Nodes};
use crate::size_class::SizeClass;
use crate::strategy::{DefaultStrategy, KeyStrategy};
use core::borrow::Borrow;
use core::fmt;
use core::mem;

/// Result of [`ChainTable::insert_or`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InsertOutcome {
    /// The key was absent and a new entry was created.
    Added,
    /// The key was present; the stored key and payload were overwritten.
    Replaced,
    /// The key was present and its entry left untouched.
    Kept,
}

impl InsertOutcome {
    /// True for [`InsertOutcome::Added`].
    pub fn is_added(self) -> bool {
        matches!(self, InsertOutcome::Added)
    }
}

#[inline]
fn bucket_index(hash: u32, buckets: usize) -> usize {
    hash as usize % buckets
}

/// Chained hash table storing a key and a payload per entry.
///
/// Maps use the value type as payload, sets use `()`. Keys are hashed and
/// compared through the strategy `S`, fixed at construction.
pub struct ChainTable<K, P, S = DefaultStrategy> {
    strategy: S,
    buckets: Vec<Option<EntryKey>>,
    store: EntryStore<K, P>,
    size_class: SizeClass,
    size_floor: SizeClass,
    grow_threshold: usize,
    shrink_threshold: usize,
    len: usize,
    flags: TableFlags,
}

impl<K, P> ChainTable<K, P> {
    pub fn new() -> Self {
        Self::with_strategy(DefaultStrategy::default())
    }

    pub fn with_capacity(reserve: usize) -> Self {
        Self::with_capacity_and_strategy(reserve, DefaultStrategy::default())
    }
}

impl<K, P> Default for ChainTable<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P, S> ChainTable<K, P, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(TableConfig::new(), strategy)
    }

    /// Empty table sized so that `reserve` entries fit without growing.
    /// A non-zero `reserve` also becomes the size below which the table
    /// never shrinks.
    pub fn with_capacity_and_strategy(reserve: usize, strategy: S) -> Self {
        Self::with_config_and_strategy(TableConfig::new().reserve(reserve), strategy)
    }

    pub fn with_config_and_strategy(config: TableConfig, strategy: S) -> Self {
        let mut table = Self {
            strategy,
            buckets: Vec::new(),
            store: EntryStore::with_capacity(config.reserve),
            size_class: SizeClass::MIN,
            size_floor: SizeClass::MIN,
            grow_threshold: 0,
            shrink_threshold: 0,
            len: 0,
            flags: config.flags,
        };
        table.reset_buckets(config.reserve);
        table
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entry count above which the next insert grows the bucket array.
    pub fn grow_threshold(&self) -> usize {
        self.grow_threshold
    }

    /// Entry count below which a removal may shrink the bucket array.
    pub fn shrink_threshold(&self) -> usize {
        self.shrink_threshold
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn flags(&self) -> TableFlags {
        self.flags
    }

    pub fn allow_duplicates(&self) -> bool {
        self.flags.allow_duplicates
    }

    pub fn set_allow_duplicates(&mut self, allow: bool) {
        self.flags.allow_duplicates = allow;
    }

    pub fn allow_shrink(&self) -> bool {
        self.flags.allow_shrink
    }

    pub fn set_allow_shrink(&mut self, allow: bool) {
        self.flags.allow_shrink = allow;
    }

    /// Makes room for `entries` and raises the shrink floor to the resulting size.
    pub fn reserve(&mut self, entries: usize) {
        self.resize_for(entries.max(self.len), true, false);
    }

    /// Drops every entry and returns to the minimum size.
    pub fn clear(&mut self) {
        self.clear_with_capacity(0);
    }

    /// Drops every entry, then sizes the table for `reserve` entries as a
    /// fresh table would be. Flags are kept.
    pub fn clear_with_capacity(&mut self, reserve: usize) {
        self.store.clear(reserve);
        self.reset_buckets(reserve);
    }

    /// Moves every entry out, leaving an empty minimum-size table.
    pub fn drain(&mut self) -> IntoIter<K, P> {
        let store = mem::replace(&mut self.store, EntryStore::with_capacity(0));
        self.reset_buckets(0);
        IntoIter {
            it: store.into_nodes(),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, P> {
        Iter::new(&self.buckets, &self.store, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, P> {
        IterMut {
            it: self.store.values_mut(),
        }
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut P) -> bool,
    {
        self.sweep(|_, key, payload| keep(key, payload), false);
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &P)>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.find(key).map(|slot| {
            let node = &self.store[slot];
            (&node.key, &node.payload)
        })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&P>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.get_key_value(key).map(|(_, payload)| payload)
    }

    /// The stored key equal to `key`.
    pub fn get_key<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.get_key_value(key).map(|(stored, _)| stored)
    }

    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a P) -> &'a P
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Direct access to the payload slot, for in-place updates without a
    /// second lookup.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut P>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        let slot = self.find(key)?;
        Some(&mut self.store[slot].payload)
    }

    /// Unlinks the entry for `key` and hands back its key and payload.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, P)>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        let hash = self.strategy.hash(key);
        self.unlink_hashed(hash, key)
            .map(|node| (node.key, node.payload))
    }

    /// Removes and drops the entry for `key`.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes the entry for `key`, dropping the key and returning the payload.
    pub fn pop<Q>(&mut self, key: &Q) -> Option<P>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.remove_entry(key).map(|(_, payload)| payload)
    }

    /// Inserts without looking for an existing entry.
    ///
    /// The caller guarantees `key` is absent unless duplicates are allowed;
    /// debug builds check it.
    pub fn insert(&mut self, key: K, payload: P)
    where
        S: KeyStrategy<K>,
    {
        let hash = self.strategy.hash(&key);
        debug_assert!(
            self.flags.allow_duplicates || self.find_hashed(hash, &key).is_none(),
            "duplicate key inserted into a table that does not allow duplicates"
        );
        self.insert_hashed(hash, key, payload);
    }

    /// Inserts `key` unless it is already present, whatever the duplicate flag says.
    pub fn try_insert(&mut self, key: K, payload: P) -> Result<&mut P, InsertError>
    where
        S: KeyStrategy<K>,
    {
        let hash = self.strategy.hash(&key);
        if self.find_hashed(hash, &key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let slot = self.insert_hashed(hash, key, payload);
        Ok(&mut self.store[slot].payload)
    }

    /// Single-lookup insert. A present key is overwritten when `replace` is
    /// set (the old key and payload are dropped); otherwise the offered key
    /// and payload are dropped.
    pub fn insert_or(&mut self, key: K, payload: P, replace: bool) -> InsertOutcome
    where
        S: KeyStrategy<K>,
    {
        self.upsert(key, payload, replace).0
    }

    /// Inserts or overwrites, handing back the displaced key and payload.
    pub fn replace(&mut self, key: K, payload: P) -> Option<(K, P)>
    where
        S: KeyStrategy<K>,
    {
        self.upsert(key, payload, true).1
    }

    fn upsert(&mut self, key: K, payload: P, replace: bool) -> (InsertOutcome, Option<(K, P)>)
    where
        S: KeyStrategy<K>,
    {
        let hash = self.strategy.hash(&key);
        match self.find_hashed(hash, &key) {
            None => {
                self.insert_hashed(hash, key, payload);
                (InsertOutcome::Added, None)
            }
            Some(slot) if replace => (
                InsertOutcome::Replaced,
                Some(self.overwrite(slot, key, payload)),
            ),
            Some(_) => (InsertOutcome::Kept, Some((key, payload))),
        }
    }

    /// Copies every entry into a new table with the same strategy and flags.
    /// Chain order is not preserved.
    ///
    /// Copied keys are hashed afresh, so `copy_key` may return keys that
    /// differ from the originals. Unless duplicates are allowed, a copied key
    /// equal to one already copied is dropped along with its payload and the
    /// first copy is kept.
    pub fn copy_with<FK, FP>(&self, mut copy_key: FK, mut copy_payload: FP) -> Self
    where
        S: Clone + KeyStrategy<K>,
        FK: FnMut(&K) -> K,
        FP: FnMut(&P) -> P,
    {
        let mut copy = self.presized_copy();
        let dedup = !self.allow_duplicates();
        let mut linked = 0;
        for node in self.nodes() {
            let key = copy_key(&node.key);
            let hash = copy.strategy.hash(&key);
            if dedup
                && copy
                    .find_hashed_by(hash, |stored| copy.strategy.eq(&key, stored))
                    .is_some()
            {
                continue;
            }
            copy.link_hashed(hash, key, copy_payload(&node.payload));
            linked += 1;
        }
        copy.len = linked;
        copy.resize_for(copy.len, false, false);
        copy
    }

    /// Empty table with this table's strategy and flags, sized for its entries.
    fn presized_copy(&self) -> Self
    where
        S: Clone,
    {
        let config = TableConfig {
            reserve: 0,
            flags: self.flags,
        };
        let mut copy = Self::with_config_and_strategy(config, self.strategy.clone());
        let class = SizeClass::for_entries(self.len);
        if class != copy.size_class {
            copy.rehash(class);
        }
        copy
    }

    pub(crate) fn nodes(&self) -> Nodes<'_, K, P> {
        Nodes(self.iter())
    }

    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(move |head| {
            let mut count = 0;
            let mut cur = *head;
            while let Some(slot) = cur {
                count += 1;
                cur = self.store[slot].next;
            }
            count
        })
    }

    fn find<Q>(&self, key: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.find_hashed(self.strategy.hash(key), key)
    }

    pub(crate) fn find_hashed<Q>(&self, hash: u32, key: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.find_hashed_by(hash, |stored| self.strategy.eq(key, stored.borrow()))
    }

    /// Chain walk with a caller-supplied key test; only entries whose cached
    /// hash equals `hash` are offered to it.
    pub(crate) fn find_hashed_by<F>(&self, hash: u32, mut is_match: F) -> Option<EntryKey>
    where
        F: FnMut(&K) -> bool,
    {
        let mut cur = self.buckets[bucket_index(hash, self.buckets.len())];
        while let Some(slot) = cur {
            let node = &self.store[slot];
            if node.hash == hash && is_match(&node.key) {
                return Some(slot);
            }
            cur = node.next;
        }
        None
    }

    /// Prepends a node to its chain without touching `len` or the size.
    fn link_hashed(&mut self, hash: u32, key: K, payload: P) -> EntryKey {
        let b = bucket_index(hash, self.buckets.len());
        let slot = self.store.alloc(Node {
            next: self.buckets[b],
            hash,
            key,
            payload,
        });
        self.buckets[b] = Some(slot);
        slot
    }

    pub(crate) fn insert_hashed(&mut self, hash: u32, key: K, payload: P) -> EntryKey {
        let slot = self.link_hashed(hash, key, payload);
        self.len += 1;
        self.resize_for(self.len, false, false);
        slot
    }

    pub(crate) fn overwrite(&mut self, slot: EntryKey, key: K, payload: P) -> (K, P) {
        let node = &mut self.store[slot];
        (
            mem::replace(&mut node.key, key),
            mem::replace(&mut node.payload, payload),
        )
    }

    pub(crate) fn unlink_hashed<Q>(&mut self, hash: u32, key: &Q) -> Option<Node<K, P>>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        let b = bucket_index(hash, self.buckets.len());
        let mut prev: Option<EntryKey> = None;
        let mut cur = self.buckets[b];
        while let Some(slot) = cur {
            let node = &self.store[slot];
            let next = node.next;
            if node.hash == hash && self.strategy.eq(key, node.key.borrow()) {
                match prev {
                    Some(p) => self.store[p].next = next,
                    None => self.buckets[b] = next,
                }
                let node = self.store.free(slot)?;
                self.len -= 1;
                self.resize_for(self.len, false, false);
                return Some(node);
            }
            prev = cur;
            cur = next;
        }
        None
    }

    /// Walks every chain once, dropping the entries `keep` rejects.
    ///
    /// The bucket array must not change mid-walk, so removals are tallied
    /// separately and `len` plus the resize evaluation are applied once the
    /// walk is done. Returns the number of entries removed.
    pub(crate) fn sweep<F>(&mut self, mut keep: F, force_shrink: bool) -> usize
    where
        F: FnMut(u32, &K, &mut P) -> bool,
    {
        let mut live = self.len;
        for b in 0..self.buckets.len() {
            let mut prev: Option<EntryKey> = None;
            let mut cur = self.buckets[b];
            while let Some(slot) = cur {
                let node = &mut self.store[slot];
                let next = node.next;
                if keep(node.hash, &node.key, &mut node.payload) {
                    prev = cur;
                } else {
                    match prev {
                        Some(p) => self.store[p].next = next,
                        None => self.buckets[b] = next,
                    }
                    self.store.free(slot);
                    live -= 1;
                }
                cur = next;
            }
        }
        let removed = self.len - live;
        self.len = live;
        debug_assert_eq!(self.len, self.store.count());
        self.resize_for(self.len, false, force_shrink);
        removed
    }

    /// Resize evaluation that may shrink regardless of `allow_shrink`; run
    /// after bulk removals.
    pub(crate) fn settle(&mut self) {
        self.resize_for(self.len, false, true);
    }

    /// Back to the minimum class with an empty bucket array, then sized for
    /// `reserve` entries (which also becomes the shrink floor when non-zero).
    fn reset_buckets(&mut self, reserve: usize) {
        let min = SizeClass::MIN;
        self.buckets = vec![None; min.buckets()];
        self.size_class = min;
        self.size_floor = min;
        self.grow_threshold = min.grow_threshold();
        self.shrink_threshold = min.shrink_threshold();
        self.len = 0;
        if reserve > 0 {
            self.resize_for(reserve, true, false);
        }
    }

    /// Resize policy: grow while above the grow threshold; shrink (when
    /// allowed or forced) while below the shrink threshold and above the
    /// floor; `reserve` pins the floor to the chosen class.
    fn resize_for(&mut self, entries: usize, reserve: bool, force_shrink: bool) {
        if !reserve && entries < self.grow_threshold && entries > self.shrink_threshold {
            return;
        }

        let mut class = self.size_class;
        while entries > class.grow_threshold() {
            match class.next() {
                Some(next) => class = next,
                None => break,
            }
        }
        if force_shrink || self.flags.allow_shrink {
            while entries < class.shrink_threshold() && class > self.size_floor {
                match class.prev() {
                    Some(prev) => class = prev,
                    None => break,
                }
            }
        }
        if reserve {
            self.size_floor = class;
        }
        if class != self.size_class {
            self.rehash(class);
        }
    }

    fn rehash(&mut self, class: SizeClass) {
        let nbuckets = class.buckets();
        log::trace!(
            "chain table resize: {} -> {} buckets ({} entries)",
            self.buckets.len(),
            nbuckets,
            self.len
        );
        let mut buckets = vec![None; nbuckets];
        for (slot, node) in self.store.iter_mut() {
            let b = bucket_index(node.hash, nbuckets);
            node.next = buckets[b];
            buckets[b] = Some(slot);
        }
        self.buckets = buckets;
        self.size_class = class;
        self.grow_threshold = class.grow_threshold();
        self.shrink_threshold = class.shrink_threshold();
    }
}

impl<K: Clone, P: Clone, S: Clone> Clone for ChainTable<K, P, S> {
    fn clone(&self) -> Self {
        let mut copy = self.presized_copy();
        for node in self.nodes() {
            copy.link_hashed(node.hash, node.key.clone(), node.payload.clone());
        }
        copy.len = self.len;
        copy
    }
}

impl<K: fmt::Debug, P: fmt::Debug, S> fmt::Debug for ChainTable<K, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, P, S> IntoIterator for &'a ChainTable<K, P, S> {
    type Item = (&'a K, &'a P);
    type IntoIter = Iter<'a, K, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, P, S> IntoIterator for ChainTable<K, P, S> {
    type Item = (K, P);
    type IntoIter = IntoIter<K, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.store.into_nodes(),
        }
    }
}
