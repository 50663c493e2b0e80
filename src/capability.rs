//! Capabilities a [`HashTable`](crate::HashTable) is parameterized over.
//!
//! A table needs three things from its caller: a way to hash keys
//! ([`KeyHasher`]), a way to compare keys ([`KeyEquality`]), and a way to
//! release keys and values it no longer holds ([`Disposer`]). Each is a
//! type parameter of the table, so the choice is resolved at compile time.
//!
//! Closures implement the hashing and equality traits directly:
//!
//! ```rust
//! use probe_table::HashTable;
//!
//! let mut table = HashTable::builder()
//!     .hasher(|k: &u32| *k as u64)
//!     .equality(|a: &u32, b: &u32| a == b)
//!     .build()
//!     .unwrap();
//!
//! table.insert(7, "seven").unwrap();
//! assert_eq!(table.get(&7), Some(&"seven"));
//! ```

use core::hash::BuildHasher;
use core::hash::Hash;
use core::marker::PhantomData;

/// Maps a key to the unsigned integer its home slot is derived from.
pub trait KeyHasher<K: ?Sized> {
    /// Hashes `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// The djb2 string hash: `h = h * 33 + byte`, seeded with 5381.
///
/// This is the default hasher of a table. It works on any key that can be
/// viewed as bytes, which covers `String`, `&str`, and `Vec<u8>`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Djb2;

const DJB2_SEED: u64 = 5381;

impl Djb2 {
    /// Hashes a byte string.
    #[inline]
    pub fn hash_bytes(bytes: &[u8]) -> u64 {
        bytes.iter().fold(DJB2_SEED, |h, &b| {
            (h << 5).wrapping_add(h).wrapping_add(b as u64)
        })
    }
}

impl<K> KeyHasher<K> for Djb2
where
    K: AsRef<[u8]> + ?Sized,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        Self::hash_bytes(key.as_ref())
    }
}

/// Adapts a [`BuildHasher`] so any `Hash` key can be stored.
///
/// ```rust
/// use probe_table::HashTable;
/// use probe_table::StdHash;
/// use std::hash::RandomState;
///
/// let mut table = HashTable::builder()
///     .hasher(StdHash(RandomState::new()))
///     .build()
///     .unwrap();
/// table.insert((1, 2), 3).unwrap();
/// assert_eq!(table.get(&(1, 2)), Some(&3));
/// ```
#[derive(Debug, Default, Clone)]
pub struct StdHash<S>(pub S);

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

/// Decides whether two keys are the same key.
///
/// Implementations must be reflexive: a key that is not equal to itself is
/// rejected on insert with [`Error::InvalidKey`](crate::Error::InvalidKey).
pub trait KeyEquality<K: ?Sized> {
    /// Returns `true` if `a` and `b` are the same key.
    fn keys_equal(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> KeyEquality<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Compares keys with their [`Eq`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StdEq;

impl<K> KeyEquality<K> for StdEq
where
    K: Eq + ?Sized,
{
    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Receives keys and values the table releases.
///
/// Called when an entry is removed, when a value is overwritten, when the
/// table is cleared, and when the table is dropped. Both methods drop their
/// argument by default.
pub trait Disposer<K, V> {
    /// Releases a key.
    #[inline]
    fn dispose_key(&mut self, key: K) {
        drop(key);
    }

    /// Releases a value.
    #[inline]
    fn dispose_value(&mut self, value: V) {
        drop(value);
    }
}

/// Drops released keys and values. The default disposer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropDisposer;

impl<K, V> Disposer<K, V> for DropDisposer {}

/// A [`Disposer`] made of one closure for keys and one for values.
///
/// ```rust
/// use std::cell::RefCell;
///
/// use probe_table::Disposers;
/// use probe_table::HashTable;
///
/// let released = RefCell::new(Vec::new());
/// {
///     let mut table = HashTable::builder()
///         .disposer(Disposers::values(|v: u32| released.borrow_mut().push(v)))
///         .build()
///         .unwrap();
///     table.insert("a", 1).unwrap();
///     table.insert("a", 2).unwrap();
/// }
/// assert_eq!(*released.borrow(), vec![1, 2]);
/// ```
#[derive(Clone)]
pub struct Disposers<KF, VF> {
    key: KF,
    value: VF,
}

impl<KF, VF> Disposers<KF, VF> {
    /// Uses `key` for released keys and `value` for released values.
    pub fn new<K, V>(key: KF, value: VF) -> Self
    where
        KF: FnMut(K),
        VF: FnMut(V),
    {
        Self { key, value }
    }
}

impl<KF, V> Disposers<KF, DropWith<V>> {
    /// Uses `key` for released keys and drops released values.
    pub fn keys<K>(key: KF) -> Self
    where
        KF: FnMut(K),
    {
        Disposers {
            key,
            value: DropWith(PhantomData),
        }
    }
}

impl<K, VF> Disposers<DropWith<K>, VF> {
    /// Uses `value` for released values and drops released keys.
    pub fn values<V>(value: VF) -> Self
    where
        VF: FnMut(V),
    {
        Disposers {
            key: DropWith(PhantomData),
            value,
        }
    }
}

/// The half of a [`Disposers`] that simply drops what it receives.
pub struct DropWith<T>(PhantomData<fn(T)>);

impl<T> Clone for DropWith<T> {
    fn clone(&self) -> Self {
        DropWith(PhantomData)
    }
}

/// Routes one kind of released item to a handler.
#[doc(hidden)]
pub trait Release<T> {
    /// Hands `item` to the handler.
    fn release(&mut self, item: T);
}

impl<T, F> Release<T> for F
where
    F: FnMut(T),
{
    #[inline]
    fn release(&mut self, item: T) {
        self(item)
    }
}

impl<T> Release<T> for DropWith<T> {
    #[inline]
    fn release(&mut self, item: T) {
        drop(item);
    }
}

impl<K, V, KF, VF> Disposer<K, V> for Disposers<KF, VF>
where
    KF: Release<K>,
    VF: Release<V>,
{
    #[inline]
    fn dispose_key(&mut self, key: K) {
        self.key.release(key);
    }

    #[inline]
    fn dispose_value(&mut self, value: V) {
        self.value.release(value);
    }
}
