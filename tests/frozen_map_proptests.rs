// FrozenMap property tests (public API only).
//
// Property 1: build/lookup equivalence against a HashMap model.
//  - Model: HashMap built from the same unique pairs.
//  - Invariant: get(k) == model.get(k) for inserted keys and random
//    probes; len() == model.len(); capacity is a power of two >= 8 and
//    len() <= capacity * 0.75; iteration yields the model's key set.
//
// Property 2: selector construction equivalence.
//  - Invariant: from_source_with(source, kf, vf) equals
//    freeze(source.map(|t| (kf(&t), vf(t)))) for unique projected keys,
//    and fails on the same first duplicate otherwise.
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap, HashSet};

use frozen_hashmap::{FreezeError, FrozenMap};

fn unique_pairs() -> impl Strategy<Value = Vec<(String, i64)>> {
    proptest::collection::hash_map("[a-z]{1,6}", any::<i64>(), 0..48)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_build_lookup_equivalence(
        pairs in unique_pairs(),
        probes in proptest::collection::vec("[a-z]{1,6}", 0..24),
    ) {
        let model: HashMap<String, i64> = pairs.iter().cloned().collect();
        let map = FrozenMap::freeze(pairs).unwrap();

        prop_assert_eq!(map.len(), model.len());
        prop_assert!(map.capacity().is_power_of_two());
        prop_assert!(map.capacity() >= 8);
        prop_assert!(map.len() * 4 <= map.capacity() * 3);

        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }
        let fallback = 0i64;
        for p in &probes {
            prop_assert_eq!(map.get(p), model.get(p));
            prop_assert_eq!(map.contains_key(p), model.contains_key(p));
            prop_assert_eq!(map.get_or(p, &fallback), model.get(p).unwrap_or(&fallback));
        }

        let keys: BTreeSet<&String> = map.keys().collect();
        let expected: BTreeSet<&String> = model.keys().collect();
        prop_assert_eq!(keys, expected);
    }
}

proptest! {
    #[test]
    fn prop_selector_equivalence(items in proptest::collection::vec((0u16..64, any::<i32>()), 0..64)) {
        // Projected key is the item's first field; value is the second.
        let mut seen = HashSet::new();
        let first_dup = items.iter().map(|(id, _)| *id).find(|id| !seen.insert(*id));

        let via_selectors =
            FrozenMap::from_source_with(items.clone(), |it| it.0, |it| it.1);
        let via_pairs = FrozenMap::freeze(items.iter().map(|&(id, v)| (id, v)));

        match (via_selectors, via_pairs, first_dup) {
            (Err(FreezeError::DuplicateKey(a)), Err(FreezeError::DuplicateKey(b)), Some(d)) => {
                prop_assert_eq!(a, d);
                prop_assert_eq!(b, d);
            }
            (Ok(a), Ok(b), None) => {
                prop_assert_eq!(a.len(), b.len());
                for (k, v) in &a {
                    prop_assert_eq!(b.get(k), Some(v));
                }
            }
            (a, b, dup) => {
                return Err(TestCaseError::fail(format!(
                    "outcome mismatch: selectors built = {}, pairs built = {}, dup = {:?}",
                    a.is_ok(), b.is_ok(), dup
                )));
            }
        }
    }
}
