#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can check the
// sizing state next to the observable map behaviour.

use crate::config::TableConfig;
use crate::error::InsertError;
use crate::size_class::{is_size_class, SIZE_CLASSES};
use crate::strategy::KeyStrategy;
use crate::table::{ChainTable, InsertOutcome};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool and the
// op list shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    TryInsert(usize, i32),
    InsertOr(usize, i32, bool),
    Replace(usize, i32),
    Remove(usize, bool),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Retain(i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryInsert(i, v)),
            3 => (idx.clone(), any::<i32>(), any::<bool>()).prop_map(|(i, v, r)| OpI::InsertOr(i, v, r)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            3 => (idx.clone(), any::<bool>()).prop_map(|(i, pop)| OpI::Remove(i, pop)),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (2i32..5).prop_map(OpI::Retain),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario(
    pool: &[String],
    ops: Vec<OpI>,
    config: TableConfig,
) -> Result<(), TestCaseError> {
    let mut sut: ChainTable<Key, i32> =
        ChainTable::with_config_and_strategy(config, Default::default());
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::TryInsert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                match sut.try_insert(k.clone(), v) {
                    Ok(slot) => {
                        prop_assert!(!already, "try_insert must fail on duplicate");
                        prop_assert_eq!(*slot, v);
                        model.insert(k, v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::InsertOr(i, v, replace) => {
                let k = key_from(pool, i);
                let outcome = sut.insert_or(k.clone(), v, replace);
                let expected = match (model.contains_key(&k), replace) {
                    (false, _) => InsertOutcome::Added,
                    (true, true) => InsertOutcome::Replaced,
                    (true, false) => InsertOutcome::Kept,
                };
                prop_assert_eq!(outcome, expected);
                if outcome != InsertOutcome::Kept {
                    model.insert(k, v);
                }
            }
            OpI::Replace(i, v) => {
                let k = key_from(pool, i);
                let old = sut.replace(k.clone(), v);
                let mold = model.insert(k.clone(), v);
                prop_assert_eq!(old, mold.map(|mv| (k, mv)));
            }
            OpI::Remove(i, false) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k).is_some());
            }
            OpI::Remove(i, true) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.pop(k.0.as_str()), model.remove(&k));
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get_key(&k), model.get_key_value(&k).map(|(mk, _)| mk));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(vr) = sut.get_mut(&k) {
                    *vr = vr.wrapping_add(d);
                }
                if let Some(mv) = model.get_mut(&k) {
                    *mv = mv.wrapping_add(d);
                }
            }
            OpI::Retain(m) => {
                sut.retain(|_, v| v.rem_euclid(m) != 0);
                model.retain(|_, v| v.rem_euclid(m) != 0);
            }
            OpI::Iterate => {
                let s_pairs: BTreeSet<(Key, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m_pairs: BTreeSet<(Key, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(sut.iter().len(), s_pairs.len());
                prop_assert_eq!(s_pairs, m_pairs);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), SIZE_CLASSES[0]);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(is_size_class(sut.bucket_count()));
        prop_assert!(sut.len() <= sut.grow_threshold());
        if sut.allow_shrink() {
            prop_assert!(
                sut.len() >= sut.shrink_threshold() || sut.bucket_count() == SIZE_CLASSES[0],
                "len {} below shrink threshold {} at {} buckets",
                sut.len(),
                sut.shrink_threshold(),
                sut.bucket_count()
            );
        }
    }
    Ok(())
}

// Property: state-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - try_insert rejects duplicates; insert_or reports Added/Replaced/Kept.
// - get/get_key/contains_key/pop parity for owned and borrowed keys.
// - iter yields each live entry exactly once and reports an exact length.
// - The bucket count is always a size class and len never exceeds the grow threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(&pool, ops, TableConfig::new())?;
    }

    // Same, with shrinking on: the count also stays at or above the shrink
    // threshold unless the table is at its smallest class.
    #[test]
    fn prop_state_machine_shrinking((pool, ops) in arb_scenario()) {
        run_scenario(&pool, ops, TableConfig::new().allow_shrink(true))?;
    }
}

// Collision variant: every key hashes to one chain, stressing equality resolution.
#[derive(Clone, Default)]
struct ConstStrategy;
impl KeyStrategy<u8> for ConstStrategy {
    fn hash(&self, _key: &u8) -> u32 {
        7
    }
    fn eq(&self, a: &u8, b: &u8) -> bool {
        a == b
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_all_collisions(ops in proptest::collection::vec((any::<bool>(), any::<u8>()), 1..200)) {
        let mut sut: ChainTable<u8, u8, ConstStrategy> = ChainTable::with_strategy(ConstStrategy);
        let mut model: HashMap<u8, u8> = HashMap::new();
        for (insert, k) in ops {
            if insert {
                prop_assert_eq!(sut.insert_or(k, k, false).is_added(), model.insert(k, k).is_none());
            } else {
                prop_assert_eq!(sut.pop(&k), model.remove(&k));
            }
            prop_assert_eq!(sut.len(), model.len());
            let q = sut.quality();
            prop_assert_eq!(q.biggest_bucket, sut.len());
        }
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
}
