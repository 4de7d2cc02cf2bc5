// ChainHashMap integration suite.
//
// Each test documents the behaviour verified and the invariants assumed or
// asserted. The core invariants exercised:
// - Uniqueness: add/try_insert never create a second entry for a key.
// - Ownership: destroyed keys and values are dropped exactly once; values
//   handed back by pop/remove_entry/replace are not dropped by the map.
// - Sizing: bucket counts stay on the size classes, grow above 3/4 load and
//   shrink below 3/16 load only when allowed or after bulk set operations.
// - Algebra: results match the set definitions for any number of operands.
use chain_hashmap::size_class::SIZE_CLASSES;
use chain_hashmap::{
    ChainHashMap, Djb2, Djb2Prefix, InsertError, InsertOutcome, IntMix, Murmur2, TableConfig, Uint4,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

// Value that counts how often it is dropped.
struct Tracked(Rc<Cell<usize>>);
impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

// Cloneable value that logs its id when dropped; clones log the same id.
#[derive(Clone)]
struct Noted {
    id: u32,
    log: Rc<RefCell<Vec<u32>>>,
}
impl Drop for Noted {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.id);
    }
}

fn noted_map(ids: &[u32], log: &Rc<RefCell<Vec<u32>>>) -> ChainHashMap<u32, Noted, IntMix> {
    let mut m = ChainHashMap::with_strategy(IntMix);
    for &id in ids {
        m.insert(id, Noted { id, log: log.clone() });
    }
    m
}

fn drained(log: &Rc<RefCell<Vec<u32>>>) -> Vec<u32> {
    let mut ids = std::mem::take(&mut *log.borrow_mut());
    ids.sort_unstable();
    ids
}

fn sorted<K: Ord + Clone, V: Clone>(m: &ChainHashMap<K, V, IntMix>) -> BTreeMap<K, V> {
    m.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn map_of(pairs: &[(u32, &'static str)]) -> ChainHashMap<u32, &'static str, IntMix> {
    let mut m = ChainHashMap::with_strategy(IntMix);
    for &(k, v) in pairs {
        m.insert(k, v);
    }
    m
}

// Test: string keys round-trip through the stock string strategy.
// Verifies: borrowed &str lookups find String keys; missing keys give None.
#[test]
fn string_keys_with_djb2() {
    let mut m: ChainHashMap<String, usize, Djb2> = ChainHashMap::with_strategy(Djb2);
    for (i, w) in ["alpha", "beta", "gamma", "delta"].iter().enumerate() {
        m.insert(w.to_string(), i);
    }
    assert_eq!(m.get("gamma"), Some(&2));
    assert_eq!(m.get("epsilon"), None);
    assert_eq!(*m.get_or("epsilon", &99), 99);
    assert!(m.contains_key("alpha"));
}

// Test: the insert family on a present key.
// Verifies: add keeps, reinsert overwrites, try_insert errors, replace returns the old pair.
#[test]
fn insert_family_on_present_key() {
    let mut m = map_of(&[(1, "one")]);
    assert!(!m.add(1, "uno"));
    assert_eq!(m.get(&1), Some(&"one"));
    assert!(!m.reinsert(1, "eins"));
    assert_eq!(m.get(&1), Some(&"eins"));
    assert_eq!(m.try_insert(1, "x").err(), Some(InsertError::DuplicateKey));
    assert_eq!(m.replace(1, "un"), Some((1, "eins")));
    assert_eq!(m.insert_or(2, "two", false), InsertOutcome::Added);
    assert_eq!(m.len(), 2);
}

// Test: drop accounting across overwrite, pop, remove and clear.
// Assumes: the map owns its values and drops them exactly once.
#[test]
fn values_dropped_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let mut m: ChainHashMap<u32, Tracked, IntMix> = ChainHashMap::with_strategy(IntMix);
    for k in 0..10 {
        m.insert(k, Tracked(drops.clone()));
    }
    assert!(!m.reinsert(0, Tracked(drops.clone())));
    assert_eq!(drops.get(), 1, "overwritten value dropped");

    let popped = m.pop(&1).expect("present");
    assert_eq!(drops.get(), 1, "popped value handed back, not dropped");
    drop(popped);
    assert_eq!(drops.get(), 2);

    assert!(m.remove(&2));
    assert_eq!(drops.get(), 3);

    m.clear();
    assert_eq!(drops.get(), 11);
    assert!(m.is_empty());
}

// Test: drop accounting through set algebra.
// Verifies: each accumulator entry removed by intersection, difference or
// symmetric difference, and each entry overwritten by a reversed union, is
// dropped exactly once; operand values are copied, never dropped.
#[test]
fn algebra_drops_removed_values_once() {
    let acc_log = Rc::new(RefCell::new(Vec::new()));
    let op_log = Rc::new(RefCell::new(Vec::new()));

    let op = noted_map(&[3, 4, 5], &op_log);
    let r = ChainHashMap::intersection(Some(noted_map(&[1, 2, 3, 4], &acc_log)), &op, &[]);
    assert_eq!(drained(&acc_log), vec![1, 2]);
    drop(r);
    assert_eq!(drained(&acc_log), vec![3, 4]);
    drop(op);
    assert_eq!(drained(&op_log), vec![3, 4, 5]);

    let op = noted_map(&[2, 3, 9], &op_log);
    let r = ChainHashMap::difference(Some(noted_map(&[1, 2, 3], &acc_log)), &op, &[]);
    assert_eq!(drained(&acc_log), vec![2, 3]);
    assert_eq!(r.len(), 1);
    drop(r);
    assert_eq!(drained(&acc_log), vec![1]);

    let r = ChainHashMap::symmetric_difference(Some(noted_map(&[1, 2, 3], &acc_log)), &op, &[]);
    assert_eq!(drained(&acc_log), vec![2, 3]);
    assert!(drained(&op_log).is_empty(), "copied operand values not dropped");
    assert_eq!(r.get(&9).map(|v| v.id), Some(9));
    drop(r);
    assert_eq!(drained(&acc_log), vec![1]);
    assert_eq!(drained(&op_log), vec![9], "copy of the operand's value");
    drop(op);
    assert_eq!(drained(&op_log), vec![2, 3, 9]);

    let op = noted_map(&[2, 7], &op_log);
    let r = ChainHashMap::union_reversed(Some(noted_map(&[1, 2], &acc_log)), &op, &[]);
    assert_eq!(drained(&acc_log), vec![2], "overwritten value dropped");
    assert!(drained(&op_log).is_empty());
    let r = ChainHashMap::union(Some(r), &op, &[]);
    assert!(drained(&acc_log).is_empty(), "plain union keeps existing values");
    assert!(drained(&op_log).is_empty());
    assert_eq!(r.len(), 3);
}

// Test: pre-sizing and growth.
// Verifies: a reserve hint picks the class whose grow threshold covers it and
// inserts up to that hint never change the bucket count.
#[test]
fn reserve_hint_avoids_growth() {
    let mut m: ChainHashMap<u32, u32, IntMix> = ChainHashMap::with_capacity_and_strategy(1000, IntMix);
    let buckets = m.bucket_count();
    assert_eq!(buckets, 2053);
    for k in 0..1000 {
        m.insert(k, k);
    }
    assert_eq!(m.bucket_count(), buckets);
    m.insert(2000, 0);
    assert_eq!(m.bucket_count(), buckets);
    for k in 2001..2001 + 540 {
        m.insert(k, 0);
    }
    assert!(m.bucket_count() > buckets);
}

// Test: hysteresis at a class boundary.
// Verifies: alternating insert/remove around the grow threshold resizes at
// most once in each direction.
#[test]
fn no_thrash_at_boundary() {
    let cfg = TableConfig::new().allow_shrink(true);
    let mut m: ChainHashMap<u32, (), IntMix> = ChainHashMap::with_config_and_strategy(cfg, IntMix);
    for k in 0..3 {
        m.insert(k, ());
    }
    assert_eq!(m.bucket_count(), 5);
    m.insert(3, ());
    assert_eq!(m.bucket_count(), 11);
    for _ in 0..10 {
        assert!(m.remove(&3));
        assert_eq!(m.bucket_count(), 11);
        m.insert(3, ());
        assert_eq!(m.bucket_count(), 11);
    }
}

// Test: clear with a reserve hint.
// Verifies: the cleared map is sized like a fresh map with the same hint.
#[test]
fn clear_with_capacity_resizes() {
    let mut m: ChainHashMap<u32, u32> = (0..500).map(|k| (k, k)).collect();
    m.clear_with_capacity(10);
    assert!(m.is_empty());
    assert_eq!(m.bucket_count(), ChainHashMap::<u32, u32>::with_capacity(10).bucket_count());
    m.clear();
    assert_eq!(m.bucket_count(), SIZE_CLASSES[0]);
}

// Test: copies.
// Verifies: a clone has the same pairs and flags; copy_with runs the copy functions.
#[test]
fn copy_preserves_contents_and_flags() {
    let cfg = TableConfig::new().allow_shrink(true);
    let mut src: ChainHashMap<u32, String, IntMix> = ChainHashMap::with_config_and_strategy(cfg, IntMix);
    for k in 0..100 {
        src.insert(k, format!("v{k}"));
    }
    let c = src.clone();
    assert_eq!(c.len(), 100);
    assert!(c.allow_shrink());
    assert_eq!(sorted(&c), sorted(&src));

    let mut copied = 0;
    let d = src.copy_with(
        |k| {
            copied += 1;
            *k
        },
        |v| v.to_uppercase(),
    );
    assert_eq!(copied, 100);
    assert_eq!(d.get(&42).map(String::as_str), Some("V42"));

    // Rewritten keys are reachable under their new hashes.
    let mut shifted = src.copy_with(|k| k + 1000, String::clone);
    assert_eq!(shifted.len(), 100);
    assert!(!shifted.contains_key(&42));
    assert_eq!(shifted.get(&1042).map(String::as_str), Some("v42"));
    assert!(shifted.remove(&1099));
    let merged = ChainHashMap::union(Some(shifted), &src, &[]);
    assert_eq!(merged.len(), 199);
}

// Test: array keys with the four-word strategy.
#[test]
fn uint4_keys() {
    let mut m: ChainHashMap<[u32; 4], &str, Uint4> = ChainHashMap::with_strategy(Uint4);
    m.insert([1, 2, 3, 4], "a");
    m.insert([4, 3, 2, 1], "b");
    assert_eq!(m.get(&[1u32, 2, 3, 4]), Some(&"a"));
    assert_eq!(m.get(&[4u32, 3, 2, 1]), Some(&"b"));
    assert_eq!(m.get(&[0u32; 4]), None);
}

// Test: union in both directions.
// Verifies: plain union keeps the earliest value, union_reversed the latest.
#[test]
fn union_direction() {
    let a = map_of(&[(1, "a1"), (2, "a2")]);
    let b = map_of(&[(2, "b2"), (3, "b3")]);
    let c = map_of(&[(3, "c3"), (4, "c4")]);

    let u = ChainHashMap::union(Some(a.clone()), &b, &[&c]);
    assert_eq!(
        sorted(&u),
        BTreeMap::from([(1, "a1"), (2, "a2"), (3, "b3"), (4, "c4")])
    );

    let r = ChainHashMap::union_reversed(Some(a), &b, &[&c]);
    assert_eq!(
        sorted(&r),
        BTreeMap::from([(1, "a1"), (2, "b2"), (3, "c3"), (4, "c4")])
    );
}

// Test: the remaining operations on maps.
// Verifies: intersection/difference keep the accumulator's values;
// symmetric difference takes values from whichever operand holds the key.
#[test]
fn map_algebra_values() {
    let a = map_of(&[(1, "a1"), (2, "a2"), (3, "a3")]);
    let b = map_of(&[(2, "b2"), (3, "b3"), (4, "b4")]);

    let i = ChainHashMap::intersection(Some(a.clone()), &b, &[]);
    assert_eq!(sorted(&i), BTreeMap::from([(2, "a2"), (3, "a3")]));

    let d = ChainHashMap::difference(Some(a.clone()), &b, &[]);
    assert_eq!(sorted(&d), BTreeMap::from([(1, "a1")]));

    let x = ChainHashMap::symmetric_difference(Some(a), &b, &[]);
    assert_eq!(sorted(&x), BTreeMap::from([(1, "a1"), (4, "b4")]));
}

// Test: predicates compare keys only.
#[test]
fn map_predicates_ignore_values() {
    let a = map_of(&[(1, "x"), (2, "y")]);
    let b = map_of(&[(1, "p"), (2, "q")]);
    let c = map_of(&[(1, "p"), (2, "q"), (3, "r")]);
    assert!(a.is_equal(&b));
    assert!(a.is_subset(&c));
    assert!(c.is_superset(&a));
    assert!(!a.is_disjoint(&c));
    assert!(map_of(&[(9, "z")]).is_disjoint(&a));
}

// Test: quality diagnostics on a populated map.
// Verifies: the load factor matches len / buckets and the score is finite.
#[test]
fn quality_reports_load() {
    let m: ChainHashMap<u32, ()> = (0..1000).map(|k| (k, ())).collect();
    let q = m.quality();
    assert!((q.load - 1000.0 / m.bucket_count() as f64).abs() < 1e-12);
    assert!(q.score.is_finite() && q.score > 0.0);
    assert!(q.biggest_bucket >= 1);
    assert!(q.prop_empty < 1.0);
}

// Test: comparing strategies with quality().
// Verifies: keys sharing a long prefix collapse into one chain under a short
// djb2 prefix, while murmur spreads them; lookups work under both.
#[test]
fn quality_compares_strategies() {
    let keys: Vec<String> = (0..500).map(|i| format!("item-{i:04}")).collect();
    let mut prefix = ChainHashMap::with_strategy(Djb2Prefix(5));
    let mut murmur = ChainHashMap::with_strategy(Murmur2);
    for (i, k) in keys.iter().enumerate() {
        prefix.insert(k.clone(), i);
        murmur.insert(k.clone(), i);
    }
    assert_eq!(prefix.get("item-0123"), Some(&123));
    assert_eq!(murmur.get("item-0123"), Some(&123));

    let (p, m) = (prefix.quality(), murmur.quality());
    assert_eq!(p.biggest_bucket, 500);
    assert!(m.biggest_bucket < 10);
    assert!(m.score < p.score);
}
