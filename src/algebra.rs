//! Multiway set algebra over `ChainTable`s.
//!
//! Every operation takes an optional accumulator (consumed and returned),
//! a required second operand and an ordered tail of further operands. With
//! no accumulator the result starts as a copy of `second` and only the tail
//! is folded in. A table is never mutated while it is being walked: removals
//! go through the engine's sweep, and symmetric difference gathers its
//! bookkeeping in transient tables of key references first.

use crate::strategy::{ByRef, KeyStrategy};
use crate::table::ChainTable;

impl<K, P, S> ChainTable<K, P, S>
where
    K: Clone,
    P: Clone,
    S: Clone + KeyStrategy<K>,
{
    fn seed<'o>(first: Option<Self>, second: &'o Self, rest: &[&'o Self]) -> (Self, Vec<&'o Self>) {
        let (acc, mut later) = match first {
            Some(acc) => (acc, vec![second]),
            None => (second.clone(), Vec::with_capacity(rest.len())),
        };
        later.extend_from_slice(rest);
        debug_assert!(
            later
                .iter()
                .all(|op| <S as KeyStrategy<K>>::same_as(acc.strategy(), op.strategy())),
            "set operation across tables with different key strategies"
        );
        (acc, later)
    }

    /// Adds every key of the later operands missing from the accumulator.
    ///
    /// When a key is already present the accumulator's entry is kept, or with
    /// `reverse` overwritten by the later operand's key and payload.
    pub fn union(first: Option<Self>, second: &Self, rest: &[&Self], reverse: bool) -> Self {
        let (mut acc, later) = Self::seed(first, second, rest);
        for &op in &later {
            for node in op.nodes() {
                match acc.find_hashed(node.hash, &node.key) {
                    None => {
                        acc.insert_hashed(node.hash, node.key.clone(), node.payload.clone());
                    }
                    Some(slot) if reverse => {
                        acc.overwrite(slot, node.key.clone(), node.payload.clone());
                    }
                    Some(_) => {}
                }
            }
        }
        log::debug!(
            "union of {} operands: {} entries",
            later.len() + 1,
            acc.len()
        );
        acc
    }

    /// Keeps only the accumulator entries whose key occurs in every later operand.
    pub fn intersection(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        let (mut acc, later) = Self::seed(first, second, rest);
        for &op in &later {
            if acc.is_empty() {
                break;
            }
            acc.sweep(|hash, key, _| op.find_hashed(hash, key).is_some(), true);
        }
        log::debug!(
            "intersection of {} operands: {} entries",
            later.len() + 1,
            acc.len()
        );
        acc
    }

    /// Drops the accumulator entries whose key occurs in any later operand.
    pub fn difference(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        let (mut acc, later) = Self::seed(first, second, rest);
        for &op in &later {
            if acc.is_empty() {
                break;
            }
            acc.sweep(|hash, key, _| op.find_hashed(hash, key).is_none(), true);
        }
        log::debug!(
            "difference of {} operands: {} entries",
            later.len() + 1,
            acc.len()
        );
        acc
    }

    /// Keeps the keys that occur in exactly one operand, accumulator included.
    ///
    /// Payloads of keys that come from a later operand are copied from it.
    pub fn symmetric_difference(first: Option<Self>, second: &Self, rest: &[&Self]) -> Self {
        let (mut acc, later) = Self::seed(first, second, rest);
        let strategy = second.strategy();

        // Keys seen once / more than once across the later operands.
        let mut seen_once: ChainTable<&K, &P, ByRef<'_, S>> =
            ChainTable::with_strategy(ByRef(strategy));
        let mut seen_multi: ChainTable<&K, (), ByRef<'_, S>> =
            ChainTable::with_strategy(ByRef(strategy));
        for &op in &later {
            for node in op.nodes() {
                let key = &node.key;
                if seen_once.find_hashed(node.hash, &key).is_none() {
                    seen_once.insert_hashed(node.hash, key, &node.payload);
                } else if seen_multi.find_hashed(node.hash, &key).is_none() {
                    seen_multi.insert_hashed(node.hash, key, ());
                }
            }
        }
        for node in seen_multi.nodes() {
            seen_once.unlink_hashed(node.hash, &node.key);
        }

        let additions: Vec<(u32, K, P)> = seen_once
            .nodes()
            .filter(|node| acc.find_hashed(node.hash, node.key).is_none())
            .map(|node| (node.hash, node.key.clone(), node.payload.clone()))
            .collect();

        // An accumulator key seen later at all occurs at least twice overall.
        acc.sweep(
            |hash, key, _| {
                seen_once
                    .find_hashed_by(hash, |cand| strategy.eq(*cand, key))
                    .is_none()
                    && seen_multi
                        .find_hashed_by(hash, |cand| strategy.eq(*cand, key))
                        .is_none()
            },
            true,
        );

        for (hash, key, payload) in additions {
            acc.insert_hashed(hash, key, payload);
        }
        acc.settle();
        log::debug!(
            "symmetric difference of {} operands: {} entries",
            later.len() + 1,
            acc.len()
        );
        acc
    }
}

impl<K, P, S> ChainTable<K, P, S>
where
    S: KeyStrategy<K>,
{
    fn check_strategy(&self, other: &Self) {
        debug_assert!(
            <S as KeyStrategy<K>>::same_as(self.strategy(), other.strategy()),
            "comparing tables with different key strategies"
        );
    }

    fn contains_all_of(&self, other: &Self) -> bool {
        other
            .nodes()
            .all(|node| self.find_hashed(node.hash, &node.key).is_some())
    }

    /// True when no key occurs in both tables. Walks the smaller one.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.check_strategy(other);
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .nodes()
            .all(|node| large.find_hashed(node.hash, &node.key).is_none())
    }

    /// True when both tables hold the same keys. Payloads are not compared.
    pub fn is_equal(&self, other: &Self) -> bool {
        self.check_strategy(other);
        self.len() == other.len() && other.contains_all_of(self)
    }

    /// True when every key of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.check_strategy(other);
        self.len() <= other.len() && other.contains_all_of(self)
    }

    /// True when every key of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }
}
