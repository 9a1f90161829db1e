//! FrozenMap: public construction and read-only query surface.

use crate::table::{RawTable, Slot, DEFAULT_SIZE_HINT};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;

/// Construction failure. Freezing a source whose keys are not unique aborts
/// and hands back the offending key; no partial map is ever returned.
#[derive(Debug, PartialEq, Eq)]
pub enum FreezeError<K> {
    /// The contained key compared equal to one already frozen in.
    DuplicateKey(K),
}

impl<K: fmt::Debug> fmt::Display for FreezeError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeError::DuplicateKey(k) => write!(f, "duplicate key: {:?}", k),
        }
    }
}

impl<K: fmt::Debug> std::error::Error for FreezeError<K> {}

/// An immutable hash map built exactly once from a finite source, after which
/// only lookups and iteration are possible.
///
/// Entries live in closed-addressing bucket chains over a power-of-two bucket
/// array sized for a fixed 0.75 load factor, so lookups are a hash, a mask,
/// and a short chain walk. Each entry's hash is computed once at build time
/// and reused if an undercounting size hint forces a rehash; `K: Hash` never
/// runs again after an entry is frozen in.
///
/// There is no interior mutability, so a `FrozenMap` is `Send`/`Sync`
/// whenever its parts are: once a built map is published to other threads,
/// concurrent lookups need no locking.
pub struct FrozenMap<K, V, S = RandomState> {
    hasher: S,
    table: RawTable<K, V>,
}

impl<K, V, S: Clone> Clone for FrozenMap<K, V, S>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
        }
    }
}

/// Best available size estimate for capacity sizing: the upper bound when the
/// iterator reports one, otherwise a nonzero lower bound, otherwise
/// [`DEFAULT_SIZE_HINT`]. Only used to size the initial bucket array; an
/// undercount is corrected by rehashing during the build.
fn size_hint_of<I: Iterator>(iter: &I) -> usize {
    match iter.size_hint() {
        (_, Some(upper)) => upper,
        (0, None) => DEFAULT_SIZE_HINT,
        (lower, None) => lower,
    }
}

impl<K, V> FrozenMap<K, V>
where
    K: Eq + Hash,
{
    /// Freeze a sequence of key/value pairs with the default hasher.
    pub fn freeze<I>(pairs: I) -> Result<Self, FreezeError<K>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::freeze_with_hasher(pairs, RandomState::default())
    }

    /// Freeze a sequence of values keyed by a selector; the value selector
    /// defaults to identity (each item is stored as its own value).
    pub fn from_source<I, KF>(source: I, key_fn: KF) -> Result<Self, FreezeError<K>>
    where
        I: IntoIterator<Item = V>,
        KF: FnMut(&V) -> K,
    {
        Self::from_source_with(source, key_fn, |item| item)
    }

    /// Freeze a sequence of items projected through both a key selector and a
    /// value selector.
    pub fn from_source_with<T, I, KF, VF>(
        source: I,
        key_fn: KF,
        value_fn: VF,
    ) -> Result<Self, FreezeError<K>>
    where
        I: IntoIterator<Item = T>,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> V,
    {
        Self::from_source_with_hasher(source, key_fn, value_fn, RandomState::default())
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Freeze key/value pairs using the provided hasher.
    pub fn freeze_with_hasher<I>(pairs: I, hasher: S) -> Result<Self, FreezeError<K>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = pairs.into_iter();
        let mut table = RawTable::with_size_hint(size_hint_of(&iter));
        for (key, value) in iter {
            let hash = hasher.hash_one(&key);
            if let Err((key, _value)) = table.insert(hash, key, value) {
                return Err(FreezeError::DuplicateKey(key));
            }
        }
        Ok(Self { hasher, table })
    }

    /// Selector-based construction with an explicit hasher.
    pub fn from_source_with_hasher<T, I, KF, VF>(
        source: I,
        mut key_fn: KF,
        mut value_fn: VF,
        hasher: S,
    ) -> Result<Self, FreezeError<K>>
    where
        I: IntoIterator<Item = T>,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> V,
    {
        Self::freeze_with_hasher(
            source.into_iter().map(|item| {
                let key = key_fn(&item);
                (key, value_fn(item))
            }),
            hasher,
        )
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Bucket count: always a power of two, at least 8, and sized so that
    /// `len() <= capacity() * 0.75`.
    pub fn capacity(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Look the key up, returning the value when present. Never panics.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_k, v)| v)
    }

    /// Like [`get`](Self::get), also returning the stored key.
    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(q);
        self.table.find(hash, q).map(|slot| (&slot.key, &slot.value))
    }

    /// Look the key up, falling back to a caller-supplied default.
    pub fn get_or<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// Iterate key/value pairs. The order is the surviving build order; it is
    /// stable for a given map but not part of the contract.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.slots().iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K, V, S, Q> Index<&Q> for FrozenMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Throwing accessor: panics with "key not found" on an absent key. Use
    /// [`get`](FrozenMap::get) or [`get_or`](FrozenMap::get_or) for the
    /// non-panicking forms.
    fn index(&self, q: &Q) -> &V {
        self.get(q).expect("key not found")
    }
}

impl<K, V, S> fmt::Debug for FrozenMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| (&slot.key, &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Borrowing iterator over keys.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _v)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

/// Borrowing iterator over values.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_k, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

/// Owning iterator over `(K, V)`; consumes the map.
pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<Slot<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| (slot.key, slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<'a, K, V, S> IntoIterator for &'a FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for FrozenMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_slots().into_iter(),
        }
    }
}
