//! ChainHashMap: the key/value front-end over `ChainTable`.

use crate::config::{TableConfig, TableFlags};
use crate::error::InsertError;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::quality::Quality;
use crate::strategy::{DefaultStrategy, KeyStrategy};
use crate::table::{ChainTable, InsertOutcome};
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

/// Chained hash map with size-class resizing and multiway set algebra.
///
/// ```
/// use chain_hashmap::ChainHashMap;
///
/// let mut ages: ChainHashMap<String, u32> = ChainHashMap::new();
/// assert!(ages.add("ada".to_string(), 36));
/// assert!(!ages.add("ada".to_string(), 99));
/// assert_eq!(ages.get("ada"), Some(&36));
/// assert!(!ages.reinsert("ada".to_string(), 37));
/// assert_eq!(ages.pop("ada"), Some(37));
/// assert!(ages.is_empty());
/// ```
pub struct ChainHashMap<K, V, S = DefaultStrategy> {
    table: ChainTable<K, V, S>,
}

impl<K, V> ChainHashMap<K, V> {
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

impl<K, V> Default for ChainHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainHashMap<K, V, S> {
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

    pub fn drain(&mut self) -> IntoIter<K, V> {
        self.table.drain()
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(keep);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.table.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.table.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.table.iter_mut())
    }

    pub fn quality(&self) -> Quality {
        self.table.quality()
    }

    /// Copies the map with caller-supplied key and value copies.
    pub fn copy_with<FK, FV>(&self, copy_key: FK, copy_value: FV) -> Self
    where
        S: Clone + KeyStrategy<K>,
        FK: FnMut(&K) -> K,
        FV: FnMut(&V) -> V,
    {
        Self {
            table: self.table.copy_with(copy_key, copy_value),
        }
    }
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    /// Inserts without checking for an existing entry.
    ///
    /// The key must be absent unless duplicates are allowed; debug builds
    /// panic otherwise. Use [`add`](Self::add) or
    /// [`try_insert`](Self::try_insert) when the key may be present.
    pub fn insert(&mut self, key: K, value: V) {
        self.table.insert(key, value);
    }

    /// Inserts if absent; otherwise drops `key` and `value`. Returns true if added.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.table.insert_or(key, value, false).is_added()
    }

    /// Inserts, or overwrites the stored key and value (dropping the old
    /// ones). Returns true if the key was new.
    pub fn reinsert(&mut self, key: K, value: V) -> bool {
        self.table.insert_or(key, value, true).is_added()
    }

    pub fn insert_or(&mut self, key: K, value: V, replace: bool) -> InsertOutcome {
        self.table.insert_or(key, value, replace)
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError> {
        self.table.try_insert(key, value)
    }

    /// Inserts or overwrites, returning the displaced key and value.
    pub fn replace(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.table.replace(key, value)
    }
}

impl<K, V, S> ChainHashMap<K, V, S> {
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.get_key_value(key)
    }

    pub fn get_key<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.get_key(key)
    }

    /// The value for `key`, or `default` when absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.get_or(key, default)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.get_mut(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.remove(key)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.remove_entry(key)
    }

    /// Removes `key`, returning its value. The stored key is dropped.
    pub fn pop<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
        Q: ?Sized,
    {
        self.table.pop(key)
    }
}

fn tables<'a, K, V, S>(rest: &[&'a ChainHashMap<K, V, S>]) -> Vec<&'a ChainTable<K, V, S>> {
    rest.iter().map(|m| &m.table).collect()
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone + KeyStrategy<K>,
{
    /// Union of all operands; on shared keys the earliest operand wins.
    ///
    /// `first` is consumed and becomes the result; with `None` the result
    /// starts as a copy of `second`.
    pub fn union(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::union(first.map(|m| m.table), &second.table, &tables(rest), false),
        }
    }

    /// Union of all operands; on shared keys the latest operand wins.
    pub fn union_reversed(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::union(first.map(|m| m.table), &second.table, &tables(rest), true),
        }
    }

    pub fn intersection(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::intersection(first.map(|m| m.table), &second.table, &tables(rest)),
        }
    }

    pub fn difference(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::difference(first.map(|m| m.table), &second.table, &tables(rest)),
        }
    }

    /// Keys present in exactly one operand, with the value of that operand.
    pub fn symmetric_difference(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        Self {
            table: ChainTable::symmetric_difference(
                first.map(|m| m.table),
                &second.table,
                &tables(rest),
            ),
        }
    }
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.table.is_disjoint(&other.table)
    }

    /// Same key set; values are not compared.
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

impl<K: Clone, V: Clone, S: Clone> Clone for ChainHashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<K, V, S> Extend<(K, V)> for ChainHashMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    /// Later pairs overwrite earlier ones with the same key.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.table.insert_or(key, value, true);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainHashMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_strategy(iter.size_hint().0, S::default());
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for ChainHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
