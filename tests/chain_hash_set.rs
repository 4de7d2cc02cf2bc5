// ChainHashSet integration suite.
//
// Invariants exercised:
// - Sets share the map engine: same sizing, same uniqueness rules.
// - Stored keys are owned; displaced or rejected keys are dropped once.
// - Set operations accept an optional accumulator and any number of
//   operands, and never modify the borrowed operands.
use chain_hashmap::{ChainHashSet, Djb2, IntMix, Pair, PtrIdentity, TableConfig};
use std::collections::BTreeSet;
use std::rc::Rc;

fn set_of(keys: &[u32]) -> ChainHashSet<u32, IntMix> {
    let mut s = ChainHashSet::with_strategy(IntMix);
    for &k in keys {
        s.insert(k);
    }
    s
}

fn keys(s: &ChainHashSet<u32, IntMix>) -> BTreeSet<u32> {
    s.iter().copied().collect()
}

fn bset(keys: &[u32]) -> BTreeSet<u32> {
    keys.iter().copied().collect()
}

// Test: basic membership through insert/add/remove/take.
#[test]
fn membership() {
    let mut s: ChainHashSet<String, Djb2> = ChainHashSet::with_strategy(Djb2);
    assert!(s.add("a".to_string()));
    assert!(!s.add("a".to_string()));
    s.insert("b".to_string());
    assert!(s.contains("a"));
    assert_eq!(s.get("b").map(String::as_str), Some("b"));
    assert!(s.remove("a"));
    assert!(!s.remove("a"));
    assert_eq!(s.take("b"), Some("b".to_string()));
    assert!(s.is_empty());
}

// Test: identity keys.
// Verifies: PtrIdentity distinguishes equal values behind different Rcs, and
// the set keeps its own strong reference until the key is removed.
#[test]
fn identity_keys_hold_references() {
    let a = Rc::new(5);
    let b = Rc::new(5);
    let mut s: ChainHashSet<Rc<i32>, PtrIdentity> = ChainHashSet::with_strategy(PtrIdentity);
    s.insert(a.clone());
    s.insert(b.clone());
    assert_eq!(s.len(), 2);
    assert_eq!(Rc::strong_count(&a), 2);
    assert!(s.remove(&a));
    assert_eq!(Rc::strong_count(&a), 1);
    assert!(s.contains(&b));
}

// Test: tuple keys through the pair strategy.
#[test]
fn pair_keys() {
    let mut s: ChainHashSet<(u32, u64), Pair<IntMix, IntMix>> =
        ChainHashSet::with_strategy(Pair(IntMix, IntMix));
    s.insert((1, 2));
    s.insert((2, 1));
    assert!(s.contains(&(1, 2)));
    assert!(!s.contains(&(1, 1)));
    assert_eq!(s.len(), 2);
}

// Test: operands are borrowed, only the accumulator is consumed.
// Verifies: every operation leaves `second` and the tail unchanged.
#[test]
fn operands_unchanged() {
    let b = set_of(&[2, 3, 4]);
    let c = set_of(&[4, 5]);
    for result in [
        ChainHashSet::union(Some(set_of(&[1, 2])), &b, &[&c]),
        ChainHashSet::intersection(Some(set_of(&[1, 2, 4])), &b, &[&c]),
        ChainHashSet::difference(Some(set_of(&[1, 2, 9])), &b, &[&c]),
        ChainHashSet::symmetric_difference(Some(set_of(&[1, 2])), &b, &[&c]),
    ] {
        assert!(result.len() <= 5);
    }
    assert_eq!(keys(&b), bset(&[2, 3, 4]));
    assert_eq!(keys(&c), bset(&[4, 5]));
}

// Test: the worked examples for each operation.
#[test]
fn worked_examples() {
    let a = set_of(&[1, 2, 3]);
    let b = set_of(&[2, 3, 4]);

    assert_eq!(keys(&ChainHashSet::union(Some(a.clone()), &b, &[])), bset(&[1, 2, 3, 4]));
    assert_eq!(keys(&ChainHashSet::intersection(Some(a.clone()), &b, &[])), bset(&[2, 3]));
    assert_eq!(keys(&ChainHashSet::difference(Some(a.clone()), &b, &[])), bset(&[1]));
    assert_eq!(
        keys(&ChainHashSet::symmetric_difference(Some(a.clone()), &b, &[])),
        bset(&[1, 4])
    );

    assert!(set_of(&[2, 3]).is_subset(&a));
    assert!(a.is_superset(&set_of(&[2, 3])));
    assert!(set_of(&[7]).is_disjoint(&a));
    assert!(a.is_equal(&set_of(&[3, 2, 1])));
}

// Test: accumulator omitted.
// Verifies: results start from a copy of `second`.
#[test]
fn none_accumulator() {
    let b = set_of(&[1, 2, 3]);
    let c = set_of(&[3, 4]);
    assert_eq!(keys(&ChainHashSet::union(None, &b, &[])), bset(&[1, 2, 3]));
    assert_eq!(keys(&ChainHashSet::intersection(None, &b, &[&c])), bset(&[3]));
    assert_eq!(keys(&ChainHashSet::difference(None, &b, &[&c])), bset(&[1, 2]));
    assert_eq!(
        keys(&ChainHashSet::symmetric_difference(None, &b, &[&c])),
        bset(&[1, 2, 4])
    );
}

// Test: intersection with an empty operand.
// Verifies: the result is empty and shrinks to the smallest size class even
// though shrinking on removal is off.
#[test]
fn empty_operand_intersection_shrinks() {
    let big: Vec<u32> = (0..5000).collect();
    let a = set_of(&big);
    assert!(!a.allow_shrink());
    let i = ChainHashSet::intersection(Some(a), &set_of(&[]), &[]);
    assert!(i.is_empty());
    assert_eq!(i.bucket_count(), 5);
}

// Test: a reserved accumulator does not shrink below its floor after algebra.
#[test]
fn algebra_respects_reserved_floor() {
    let mut a: ChainHashSet<u32, IntMix> =
        ChainHashSet::with_config_and_strategy(TableConfig::new().reserve(500), IntMix);
    for k in 0..400 {
        a.insert(k);
    }
    let floor = a.bucket_count();
    let d = ChainHashSet::difference(Some(a), &set_of(&(0..399).collect::<Vec<_>>()), &[]);
    assert_eq!(d.len(), 1);
    assert_eq!(d.bucket_count(), floor);
}

// Test: owned and draining iteration.
#[test]
fn drain_and_into_iter() {
    let mut s: ChainHashSet<u32> = (0..20).collect();
    let drained: BTreeSet<u32> = s.drain().collect();
    assert_eq!(drained.len(), 20);
    assert!(s.is_empty());
    s.extend([1, 2, 2, 3]);
    assert_eq!(s.len(), 3);
    let owned: BTreeSet<u32> = s.into_iter().collect();
    assert_eq!(owned, BTreeSet::from([1, 2, 3]));
}
