//! RawTable: bucket-and-chain storage layer operating on precomputed hashes.
//!
//! Buckets hold chain heads as indices into a slot vector; each slot carries
//! its key, value, stored `u64` hash, and the index of the next slot in the
//! same bucket. Only `K: Eq` ever runs inside this layer; hashing happens in
//! the public layer and the stored hash is reused on rehash.

use core::borrow::Borrow;

/// Fixed load factor applied at construction; never changes afterwards.
pub(crate) const LOAD_FACTOR: f64 = 0.75;

/// Bucket arrays never shrink below this many chain heads.
pub(crate) const MIN_CAPACITY: usize = 8;

/// Size hint used when the source cannot report its length cheaply.
pub(crate) const DEFAULT_SIZE_HINT: usize = 4;

/// Bucket count for `n` entries at `load_factor`: truncating division toward
/// zero, then the smallest power of two at or above the target, floored at
/// [`MIN_CAPACITY`]. Dependent sizing behavior pins these exact values, so
/// the division must truncate rather than round (e.g. n=7 gives target 9 and
/// capacity 16, not 8).
pub(crate) fn capacity_for(n: usize, load_factor: f64) -> usize {
    let target = (n as f64 / load_factor) as usize;
    let mut cap = 1usize;
    while cap < target {
        cap <<= 1;
    }
    cap.max(MIN_CAPACITY)
}

#[derive(Clone, Debug)]
pub(crate) struct Slot<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
    /// Next slot index in the same bucket chain.
    next: Option<usize>,
}

#[derive(Clone)]
pub(crate) struct RawTable<K, V> {
    /// Chain heads; length is always a power of two >= MIN_CAPACITY.
    buckets: Box<[Option<usize>]>,
    slots: Vec<Slot<K, V>>,
    load_factor: f64,
}

impl<K, V> RawTable<K, V> {
    /// Allocate buckets for the expected population. The hint may undercount;
    /// `insert` rehashes when the real population outgrows it.
    pub(crate) fn with_size_hint(hint: usize) -> Self {
        let cap = capacity_for(hint, LOAD_FACTOR);
        Self {
            buckets: vec![None; cap].into_boxed_slice(),
            slots: Vec::with_capacity(hint),
            load_factor: LOAD_FACTOR,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn into_slots(self) -> Vec<Slot<K, V>> {
        self.slots
    }

    #[inline]
    fn bucket_of(hash: u64, bucket_count: usize) -> usize {
        // Valid only because bucket_count is a power of two.
        (hash as usize) & (bucket_count - 1)
    }

    /// Replace the bucket array and relink every slot by its stored hash.
    /// `K: Hash` is never invoked here; only chain identity changes.
    fn rehash(&mut self, new_bucket_count: usize) {
        debug_assert!(new_bucket_count.is_power_of_two());
        let mut buckets = vec![None; new_bucket_count].into_boxed_slice();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let b = Self::bucket_of(slot.hash, new_bucket_count);
            slot.next = buckets[b];
            buckets[b] = Some(i);
        }
        self.buckets = buckets;
    }
}

impl<K, V> RawTable<K, V>
where
    K: Eq,
{
    /// Walk the chain for `hash`, comparing full keys rather than hashes.
    pub(crate) fn find<Q>(&self, hash: u64, q: &Q) -> Option<&Slot<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets[Self::bucket_of(hash, self.buckets.len())];
        while let Some(i) = cur {
            let slot = &self.slots[i];
            if slot.hash == hash && slot.key.borrow() == q {
                return Some(slot);
            }
            cur = slot.next;
        }
        None
    }

    /// Link `key` -> `value` under `hash`, growing when the sized bucket
    /// array can no longer honor the load factor. A key equal to one already
    /// present hands the pair back unchanged so the caller can report which
    /// key collided; the duplicate scan runs before any growth, so a rejected
    /// insert leaves the table untouched.
    pub(crate) fn insert(&mut self, hash: u64, key: K, value: V) -> Result<(), (K, V)> {
        let mut cur = self.buckets[Self::bucket_of(hash, self.buckets.len())];
        while let Some(i) = cur {
            let slot = &self.slots[i];
            if slot.hash == hash && slot.key == key {
                return Err((key, value));
            }
            cur = slot.next;
        }

        let required = capacity_for(self.slots.len() + 1, self.load_factor);
        if required > self.buckets.len() {
            self.rehash(required);
        }

        let b = Self::bucket_of(hash, self.buckets.len());
        let idx = self.slots.len();
        self.slots.push(Slot {
            key,
            value,
            hash,
            next: self.buckets[b],
        });
        self.buckets[b] = Some(idx);

        debug_assert!(self.buckets.len().is_power_of_two());
        debug_assert!(self.slots.len() as f64 <= self.buckets.len() as f64 * self.load_factor);
        Ok(())
    }
}
