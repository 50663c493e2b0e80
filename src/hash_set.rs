use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::capability::DropDisposer;
use crate::capability::StdEq;
use crate::capability::StdHash;
use crate::hash_map::or_panic;
use crate::hash_table;
use crate::hash_table::HashTable;

/// A hash set implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values. Each value is
/// stored as a table key with a `()` value.
#[derive(Clone)]
pub struct HashSet<T, S> {
    table: HashTable<T, (), StdHash<S>, StdEq, DropDisposer>,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::hash::RandomState;
    ///
    /// use probe_table::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash set with room for at least `capacity` values
    /// before it grows.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let mut table = or_panic(
            HashTable::builder()
                .hasher(StdHash(hash_builder))
                .build(),
        );
        or_panic(table.reserve(capacity));
        Self { table }
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all values from the set, keeping its capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Shrinks the set to the smallest capacity that fits its values.
    pub fn shrink_to_fit(&mut self) {
        or_panic(self.table.shrink_to_fit());
    }

    /// Reserves capacity for at least `additional` more values.
    pub fn reserve(&mut self, additional: usize) {
        or_panic(self.table.reserve(additional));
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was not already present. If it was, the
    /// stored value is kept and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::hash::RandomState;
    ///
    /// use probe_table::HashSet;
    ///
    /// let mut set = HashSet::with_hasher(RandomState::new());
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        or_panic(self.table.replace(value, ())).is_none()
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.table.contains_key(value)
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.table.get_key_value(value).map(|(k, _)| k)
    }

    /// Removes `value` from the set. Returns `true` if it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(value).is_ok()
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.table.take(value).ok().map(|(k, ())| k)
    }

    /// Adds `value`, replacing and returning an equal stored value.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let old = self.take(&value);
        self.insert(value);
        old
    }

    /// An iterator visiting all values in arbitrary order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.keys(),
        }
    }

    /// Clears the set, returning all values as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns `true` if the sets have no values in common.
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if every value of `self` is in `other`.
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every value of `other` is in `self`.
    pub fn is_superset(&self, other: &HashSet<T, S>) -> bool {
        other.is_subset(self)
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash set using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash set with the specified capacity using the default
    /// hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the values of a [`HashSet`].
pub struct Iter<'a, T> {
    inner: hash_table::Keys<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the values of a [`HashSet`].
pub struct Drain<'a, T> {
    inner: hash_table::Drain<'a, T, ()>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::new();
        assert!(set.is_empty());

        let set2 = HashSet::<i32, _>::with_capacity_and_hasher(100, SipHashBuilder::default());
        assert!(set2.capacity() >= 100);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        assert!(set.insert("a".to_string()));
        assert!(set.insert("b".to_string()));
        assert!(!set.insert("a".to_string()));

        assert_eq!(set.len(), 2);
        assert!(set.contains(&"a".to_string()));
        assert!(!set.contains(&"c".to_string()));
        assert_eq!(set.get(&"b".to_string()), Some(&"b".to_string()));
    }

    #[test]
    fn test_remove() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for i in 0..100 {
            set.insert(i);
        }
        for i in 0..90 {
            assert!(set.remove(&i));
        }
        assert!(!set.remove(&0));
        assert_eq!(set.len(), 10);
        for i in 90..100 {
            assert!(set.contains(&i));
        }
    }

    #[test]
    fn test_take_and_replace() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(5);

        assert_eq!(set.take(&5), Some(5));
        assert_eq!(set.take(&5), None);
        assert_eq!(set.replace(7), None);
        assert_eq!(set.replace(7), Some(7));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter_and_drain() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for i in 10..20u64 {
            set.insert(i);
        }

        let mut collected: Vec<u64> = set.iter().copied().collect();
        collected.sort();
        assert_eq!(collected, (10..20).collect::<Vec<_>>());
        assert_eq!((&set).into_iter().count(), 10);

        let drained: Vec<u64> = set.drain().collect();
        assert_eq!(drained.len(), 10);
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_relations() {
        let a: HashSet<i32, SipHashBuilder> = (0..5).collect();
        let b: HashSet<i32, SipHashBuilder> = (0..10).collect();
        let c: HashSet<i32, SipHashBuilder> = (20..25).collect();

        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(b.is_superset(&a));
        assert!(a.is_disjoint(&c));
        assert!(!a.is_disjoint(&b));
    }

    #[test]
    fn test_eq_and_debug() {
        let mut a: HashSet<String, SipHashBuilder> = HashSet::new();
        let mut b: HashSet<String, SipHashBuilder> = HashSet::new();
        for i in 0..5 {
            a.insert(format!("v{i}"));
        }
        for i in (0..5).rev() {
            b.insert(format!("v{i}"));
        }
        assert_eq!(a, b);

        b.insert("extra".to_string());
        assert_ne!(a, b);

        let mut single: HashSet<i32, SipHashBuilder> = HashSet::new();
        single.insert(1);
        assert_eq!(format!("{:?}", single), "{1}");
    }

    #[test]
    fn test_clear_and_extend() {
        let mut set: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(64);
        set.extend(0..40);
        assert_eq!(set.len(), 40);

        let capacity = set.capacity();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);

        set.extend([1, 1, 2]);
        assert_eq!(set.len(), 2);
    }
}
