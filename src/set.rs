//! ChainHashSet: the key-only front-end over `ChainTable`.

use crate::config::{TableConfig, TableFlags};
use crate::error::InsertError;
use crate::iter;
use crate::quality::Quality;
use crate::strategy::{DefaultStrategy, KeyStrategy};
use crate::table::ChainTable;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

/// Chained hash set sharing the engine of [`ChainHashMap`](crate::ChainHashMap).
///
/// ```
/// use chain_hashmap::ChainHashSet;
///
/// let a: ChainHashSet<u32> = [1, 2, 3].into_iter().collect();
/// let b: ChainHashSet<u32> = [2, 3, 4].into_iter().collect();
/// let x = ChainHashSet::symmetric_difference(Some(a.clone()), &b, &[]);
/// let mut keys: Vec<u32> = x.iter().copied().collect();
/// keys.sort();
/// assert_eq!(keys, [1, 4]);
/// assert!(ChainHashSet::intersection(None, &a, &[&b]).is_subset(&a));
/// ```
pub struct ChainHashSet<K, S = DefaultStrategy> {
    table: ChainTable<K, (), S>,
}

impl<K> ChainHashSet<K> {
    pub fn new() -> Self {
        Self {
            table: ChainTable::new(),
        }
    }

    pub fn with_capacity(reserve: usize) -> Self {
        Self {
            table: ChainTable::with_capacity(reserve),
        }
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_strategy(config, DefaultStrategy::default())
    }
}

impl<K> Default for ChainHashSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> ChainHashSet<K, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            table: ChainTable::with_strategy(strategy),
        }
    }

    pub fn with_capacity_and_strategy(reserve: usize, strategy: S) -> Self {
        Self {
            table: ChainTable::with_capacity_and_strategy(reserve, strategy),
        }
    }

    pub fn with_config_and_strategy(config: TableConfig, strategy: S) -> Self {
        Self {
            table: ChainTable::with_config_and_strategy(config, strategy),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn grow_threshold(&self) -> usize {
        self.table.grow_threshold()
    }

    pub fn shrink_threshold(&self) -> usize {
        self.table.shrink_threshold()
    }

    pub fn strategy(&self) -> &S {
        self.table.strategy()
    }

    pub fn flags(&self) -> TableFlags {
        self.table.flags()
    }

    pub fn allow_duplicates(&self) -> bool {
        self.table.allow_duplicates()
    }

    pub fn set_allow_duplicates(&mut self, allow: bool) {
        self.table.set_allow_duplicates(allow);
    }

    pub fn allow_shrink(&self) -> bool {
        self.table.allow_shrink()
    }

    pub fn set_allow_shrink(&mut self, allow: bool) {
        self.table.set_allow_shrink(allow);
    }

    pub fn reserve(&mut self, entries: usize) {
        self.table.reserve(entries);
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn clear_with_capacity(&mut self, reserve: usize) {
        self.table.clear_with_capacity(reserve);
    }

    pub fn drain(&mut self) -> IntoIter<K> {
        IntoIter(self.table.drain())
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.table.retain(|key, _| keep(key));
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter(self.table.iter())
    }

    pub fn quality(&self) -> Quality {
        self.table.quality()
    }

    pub fn copy_with<F>(&self, copy_key: F) -> Self
    where
        S: Clone + KeyStrategy<K>,
        F: FnMut(&K) -> K,
    {
        Self {
            table: self.table.copy_with(copy_key, |_| ()),
        }
    }
}

impl<K, S> ChainHashSet<K, S>
where
    S: KeyStrategy<K>,
{
    /// Inserts without checking for an existing entry; see
    /// [`ChainHashMap::insert`](crate::ChainHashMap::insert).
    pub fn insert(&mut self, key: K) {
        self.table.insert(key, ());
    }

    /// Inserts if absent, otherwise drops `key`. Returns true if added.
    pub fn add(&mut self, key: K) -> bool {
        self.table.insert_or(key, (), false).is_added()
    }

    /// Inserts, or swaps in `key` for the equal stored key (dropping the old
    /// one). Returns true if the key was new.
    pub fn reinsert(&mut self, key: K) -> bool {
        self.table.insert_or(key, (), true).is_added()
    }

    pub fn try_insert(&mut self, key: K) -> Result<(), InsertError> {
        self.table.try_insert(key, ()).map(|_| ())
    }

    /// Inserts `key`, returning the equal key it displaced.
    pub fn replace(&mut self, key: K) -> Option<K> {
        self.table.replace(key, ()).map(|(old, ())| old)
    }
}

impl<K, S> ChainHashSet<K, S> {
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.contains_key(key)
    }

    /// The stored key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.get_key(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.remove(key)
    }

    /// Removes and returns the stored key equal to `key`.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.remove_entry(key).map(|(k, ())| k)
    }
}

fn tables<'a, K, S>(rest: &[&'a ChainHashSet<K, S>]) -> Vec<&'a ChainTable<K, (), S>> {
    rest.iter().map(|s| &s.table).collect()
}

impl<K, S> ChainHashSet<K, S>
where
    K: Clone,
    S: Clone + KeyStrategy<K>,
{
    /// Union of all operands. Keys already in the result are left as they are.
    pub fn union(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::union(first.map(|s| s.table), &second.table, &tables(rest), false),
        }
    }

    pub fn intersection(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::intersection(first.map(|s| s.table), &second.table, &tables(rest)),
        }
    }

    pub fn difference(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::difference(first.map(|s| s.table), &second.table, &tables(rest)),
        }
    }

    pub fn symmetric_difference(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::symmetric_difference(
                first.map(|s| s.table),
                &second.table,
                &tables(rest),
            ),
        }
    }
}

impl<K, S> ChainHashSet<K, S>
where
    S: KeyStrategy<K>,
{
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.table.is_disjoint(&other.table)
    }

    pub fn is_equal(&self, other: &Self) -> bool {
        self.table.is_equal(&other.table)
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.table.is_subset(&other.table)
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.table.is_superset(&other.table)
    }
}

impl<K: Clone, S: Clone> Clone for ChainHashSet<K, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for ChainHashSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S> Extend<K> for ChainHashSet<K, S>
where
    S: KeyStrategy<K>,
{
    /// Keys already present are kept; the incoming duplicates are dropped.
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K, S> FromIterator<K> for ChainHashSet<K, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity_and_strategy(iter.size_hint().0, S::default());
        set.extend(iter);
        set
    }
}

impl<'a, K, S> IntoIterator for &'a ChainHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S> IntoIterator for ChainHashSet<K, S> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.table.into_iter())
    }
}

/// Borrowing iterator over the keys of a [`ChainHashSet`].
pub struct Iter<'a, K>(iter::Iter<'a, K, ()>);

impl<K> Iter<'_, K> {
    pub fn is_done(&self) -> bool {
        self.0.is_done()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter(self.0.clone())
    }
}

/// Owning iterator over the keys of a [`ChainHashSet`].
pub struct IntoIter<K>(iter::IntoIter<K, ()>);

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.0.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
