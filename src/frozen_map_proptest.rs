#![cfg(test)]

// Property tests for FrozenMap kept inside the crate so they can pin the
// sizing math against `table::capacity_for` without feature gates.

use crate::frozen_map::{FreezeError, FrozenMap};
use crate::table::{capacity_for, LOAD_FACTOR};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hasher;

// Iterator wrapper that hides its length, forcing the default size hint and
// the mid-build rehash path.
struct NoHint<I>(I);

impl<I: Iterator> Iterator for NoHint<I> {
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

fn arb_pairs() -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec(("[a-z]{0,5}", any::<i32>()), 0..64)
}

// Unique keys generated directly; short keys repeat far too often for
// rejection sampling to survive 64-entry vectors.
fn arb_unique_pairs() -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::hash_map("[a-z]{0,5}", any::<i32>(), 0..64)
        .prop_map(|m| m.into_iter().collect())
}

// First key in `pairs` that repeats an earlier key, if any. Freezing must
// fail on exactly that key and succeed otherwise.
fn first_duplicate(pairs: &[(String, i32)]) -> Option<String> {
    let mut seen = HashSet::new();
    for (k, _v) in pairs {
        if !seen.insert(k.clone()) {
            return Some(k.clone());
        }
    }
    None
}

fn check_against_model(
    map: &FrozenMap<String, i32>,
    model: &HashMap<String, i32>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(map.len(), model.len());
    prop_assert_eq!(map.is_empty(), model.is_empty());

    // Capacity invariants: power of two, floor of 8, load factor honored.
    let cap = map.capacity();
    prop_assert!(cap.is_power_of_two());
    prop_assert!(cap >= 8);
    prop_assert!(map.len() * 4 <= cap * 3);

    // Every inserted key resolves to its value; get/contains/get_or agree.
    let fallback = i32::MIN;
    for (k, v) in model {
        prop_assert_eq!(map.get(k), Some(v));
        prop_assert!(map.contains_key(k));
        prop_assert_eq!(map.get_or(k, &fallback), v);
        prop_assert_eq!(&map[k], v);
    }

    // Iteration yields each entry exactly once.
    let seen: BTreeSet<String> = map.keys().cloned().collect();
    let expected: BTreeSet<String> = model.keys().cloned().collect();
    prop_assert_eq!(map.iter().count(), model.len());
    prop_assert_eq!(seen, expected);
    Ok(())
}

// Property: freezing any pair sequence either rejects the first repeated key
// or produces a map equivalent to the HashMap model, with the capacity sized
// exactly by `capacity_for` over the source's size hint.
proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]
    #[test]
    fn prop_freeze_matches_model(pairs in arb_pairs(), probes in proptest::collection::vec("[a-z]{0,5}", 0..16)) {
        let dup = first_duplicate(&pairs);
        let res = FrozenMap::freeze(pairs.clone());
        match (res, dup) {
            (Err(FreezeError::DuplicateKey(k)), Some(expected)) => {
                prop_assert_eq!(k, expected);
            }
            (Ok(map), None) => {
                let model: HashMap<String, i32> = pairs.iter().cloned().collect();
                check_against_model(&map, &model)?;
                // Exact-sized source: no rehash, capacity comes straight
                // from the size hint.
                prop_assert_eq!(map.capacity(), capacity_for(pairs.len(), LOAD_FACTOR));

                // Random probes: absent keys miss, get_or falls back.
                let fallback = -1;
                for p in &probes {
                    let present = model.contains_key(p);
                    prop_assert_eq!(map.get(p).is_some(), present);
                    prop_assert_eq!(map.contains_key(p), present);
                    if !present {
                        prop_assert_eq!(map.get_or(p, &fallback), &fallback);
                    }
                }
            }
            (res, dup) => {
                return Err(TestCaseError::fail(format!(
                    "outcome mismatch: built = {}, expected duplicate = {:?}",
                    res.is_ok(), dup
                )));
            }
        }
    }
}

// Property: hiding the source length forces the default hint of 4 and the
// rehash path; every association must survive relinking and the final
// capacity must equal the exact-sized build's.
proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]
    #[test]
    fn prop_undercounted_hint_rehashes_losslessly(pairs in arb_unique_pairs()) {
        let map = FrozenMap::freeze(NoHint(pairs.clone().into_iter())).unwrap();
        let model: HashMap<String, i32> = pairs.iter().cloned().collect();
        check_against_model(&map, &model)?;
        prop_assert_eq!(map.capacity(), capacity_for(pairs.len().max(4), LOAD_FACTOR));
    }
}

// Collision variant using a constant hasher: everything lands in one chain
// and equality alone must resolve lookups and duplicate detection.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_freeze_with_collisions(pairs in arb_pairs()) {
        let dup = first_duplicate(&pairs);
        let res = FrozenMap::freeze_with_hasher(pairs.clone(), ConstBuildHasher);
        match (res, dup) {
            (Err(FreezeError::DuplicateKey(k)), Some(expected)) => {
                prop_assert_eq!(k, expected);
            }
            (Ok(map), None) => {
                let model: HashMap<String, i32> = pairs.iter().cloned().collect();
                prop_assert_eq!(map.len(), model.len());
                for (k, v) in &model {
                    prop_assert_eq!(map.get(k), Some(v));
                }
                prop_assert!(!map.contains_key("not-a-key!"));
            }
            (res, dup) => {
                return Err(TestCaseError::fail(format!(
                    "outcome mismatch: built = {}, expected duplicate = {:?}",
                    res.is_ok(), dup
                )));
            }
        }
    }
}
