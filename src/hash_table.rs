//! An open-addressing hash table with linear probing.
//!
//! Every entry lives directly in a contiguous slot array. A key's home slot
//! is `hash(key) % capacity`; lookups walk forward one slot at a time from
//! there until they find the key or reach a slot that has never held an
//! entry. Removal leaves a tombstone behind so entries placed further along
//! the same chain stay reachable.
//!
//! The table grows to twice its capacity when an insert finds it at least
//! 75% full, and shrinks to half its capacity when a removal leaves it less
//! than 25% full. Capacity never drops below a configurable floor.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;

use crate::capability::Disposer;
use crate::capability::Djb2;
use crate::capability::DropDisposer;
use crate::capability::KeyEquality;
use crate::capability::KeyHasher;
use crate::capability::StdEq;
use crate::error::Error;
use crate::error::Result;

/// Capacity used when a table is created with a requested capacity of zero.
pub const DEFAULT_CAPACITY: usize = 16;

/// Capacity floor used unless the builder sets another one.
pub const DEFAULT_MIN_CAPACITY: usize = 8;

const RESIZE_FACTOR: usize = 2;

/// Smallest population at which an insert grows the table.
///
/// Equivalent to `len >= capacity * 0.75` without going through floats.
#[inline(always)]
fn grow_threshold(capacity: usize) -> usize {
    capacity - capacity / 4
}

/// A removal that leaves fewer entries than this shrinks the table.
///
/// Equivalent to `len < capacity * (1 - 0.75)`.
#[inline(always)]
fn shrink_threshold(capacity: usize) -> usize {
    capacity.div_ceil(4)
}

/// Applies the floor and rounds up to a power of two.
#[inline]
fn clamp_capacity(requested: usize, floor: usize) -> Result<usize> {
    requested
        .max(floor)
        .checked_next_power_of_two()
        .ok_or(Error::CapacityOverflow)
}

/// Smallest capacity, at least `floor`, that holds `entries` without
/// crossing the grow threshold.
fn capacity_for(entries: usize, floor: usize) -> Result<usize> {
    let mut capacity = clamp_capacity(floor, 1)?;
    while grow_threshold(capacity) < entries {
        capacity = capacity
            .checked_mul(RESIZE_FACTOR)
            .ok_or(Error::CapacityOverflow)?;
    }
    Ok(capacity)
}

#[derive(Clone)]
enum Slot<K, V> {
    /// Never held an entry since the last rebuild. Terminates probes.
    Empty,
    Occupied(K, V),
    /// Held an entry that was removed. Probes continue past it.
    Tombstone,
}

fn allocate_slots<K, V>(capacity: usize) -> Result<Vec<Slot<K, V>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| Error::Allocation { capacity, source })?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

enum Probe {
    /// The slot holds an equal key.
    Found(usize),
    /// The key is absent; this is where it should be placed.
    Vacant(usize),
    /// Every slot is occupied by some other key.
    Exhausted,
}

/// Debug statistics for hash table analysis.
///
/// Requires the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of slots
    pub capacity: usize,
    /// Number of slots holding a tombstone
    pub tombstones: usize,
    /// Number of slots that have never held an entry since the last rebuild
    pub empty_slots: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance between an entry and its home slot
    pub max_probe_length: usize,
    /// Bytes used by the slot array
    pub total_bytes: usize,
    /// Bytes used by slots that hold no entry
    pub wasted_bytes: usize,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} empty, {} tombstoned",
            self.empty_slots, self.tombstones
        );
        println!("Longest probe: {}", self.max_probe_length);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table mapping keys of type `K` to values of type
/// `V`.
///
/// The table is parameterized over three capabilities:
///
/// - `H`, a [`KeyHasher`]: [`Djb2`] by default, which hashes keys as byte
///   strings.
/// - `E`, a [`KeyEquality`]: [`StdEq`] by default, which uses the key's
///   [`Eq`] implementation.
/// - `D`, a [`Disposer`]: [`DropDisposer`] by default. Every key and value
///   the table releases (on removal, overwrite, [`clear`](Self::clear), or
///   drop) is passed to it.
///
/// Use [`HashTable::with_capacity`] for string-like keys with the defaults,
/// or [`HashTable::builder`] to supply capabilities.
///
/// # Examples
///
/// ```rust
/// use probe_table::Error;
/// use probe_table::HashTable;
///
/// let mut table = HashTable::with_capacity(0).unwrap();
/// table.insert("apple", 3).unwrap();
/// table.insert("pear", 5).unwrap();
///
/// assert_eq!(table.get(&"apple"), Some(&3));
/// assert_eq!(table.len(), 2);
///
/// table.remove(&"apple").unwrap();
/// assert_eq!(table.get(&"apple"), None);
/// assert_eq!(table.remove(&"apple"), Err(Error::NotFound));
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, H = Djb2, E = StdEq, D = DropDisposer>
where
    D: Disposer<K, V>,
{
    slots: Vec<Slot<K, V>>,
    len: usize,
    tombstones: usize,
    min_capacity: usize,

    hasher: H,
    equality: E,
    disposer: D,

    trace: bool,
}

impl<K, V, H, E, D> Debug for HashTable<K, V, H, E, D>
where
    K: Debug,
    V: Debug,
    D: Disposer<K, V>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H, E, D> Drop for HashTable<K, V, H, E, D>
where
    D: Disposer<K, V>,
{
    fn drop(&mut self) {
        self.dispose_all();
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates a table for string-like keys using the default capabilities.
    ///
    /// A `capacity` of zero selects [`DEFAULT_CAPACITY`]. Smaller capacities
    /// are raised to [`DEFAULT_MIN_CAPACITY`], and the result is rounded up
    /// to a power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let table: HashTable<String, u32> = HashTable::with_capacity(0).unwrap();
    /// assert_eq!(table.capacity(), 16);
    ///
    /// let table: HashTable<String, u32> = HashTable::with_capacity(2).unwrap();
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self>
    where
        K: AsRef<[u8]> + Eq,
    {
        Self::builder().capacity(capacity).build()
    }

    /// Starts configuring a table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::builder()
    ///     .capacity(64)
    ///     .min_capacity(32)
    ///     .hasher(|k: &u64| k.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    ///     .equality(|a: &u64, b: &u64| a == b)
    ///     .build()
    ///     .unwrap();
    ///
    /// table.insert(1, "one").unwrap();
    /// assert_eq!(table.capacity(), 64);
    /// assert_eq!(table.min_capacity(), 32);
    /// ```
    pub fn builder() -> TableBuilder<K, V> {
        TableBuilder {
            capacity: 0,
            min_capacity: DEFAULT_MIN_CAPACITY,
            hasher: Djb2,
            equality: StdEq,
            disposer: DropDisposer,
            trace: false,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, H, E, D> HashTable<K, V, H, E, D>
where
    D: Disposer<K, V>,
{
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the capacity floor. Shrinking never goes below it.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Returns `len / capacity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(16).unwrap();
    /// for key in ["a", "b", "c", "d"] {
    ///     table.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(table.load_factor(), 0.25);
    /// ```
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Returns the number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns whether diagnostic traces are emitted.
    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Turns diagnostic traces on or off.
    ///
    /// When on, lookups log at `trace` level and resizes log at `debug` level
    /// through the [`log`] facade. Traces never change what the table does.
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    /// Returns an iterator over the entries, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.insert("x", 1).unwrap();
    /// table.insert("y", 2).unwrap();
    ///
    /// let mut total = 0;
    /// for (_key, value) in table.iter() {
    ///     total += value;
    /// }
    /// assert_eq!(total, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the entries with mutable access to values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Removes every entry and yields it by value.
    ///
    /// Drained entries belong to the caller and are not passed to the
    /// disposer. Capacity is unchanged. Entries not consumed before the
    /// iterator is dropped are dropped with it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.insert("a", 1).unwrap();
    /// table.insert("b", 2).unwrap();
    ///
    /// let mut drained: Vec<_> = table.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, vec![("a", 1), ("b", 2)]);
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            slots: self.slots.iter_mut(),
            len: &mut self.len,
            tombstones: &mut self.tombstones,
        }
    }

    /// Disposes every entry and resets every slot to empty.
    ///
    /// Capacity is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.insert("a", 1).unwrap();
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.get(&"a"), None);
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn clear(&mut self) {
        self.dispose_all();
        self.len = 0;
        self.tombstones = 0;
    }

    fn dispose_all(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Slot::Occupied(key, value) = mem::replace(slot, Slot::Empty) {
                self.disposer.dispose_key(key);
                self.disposer.dispose_value(value);
            }
        }
    }
}

impl<K, V, H, E, D> HashTable<K, V, H, E, D>
where
    H: KeyHasher<K>,
    E: KeyEquality<K>,
    D: Disposer<K, V>,
{
    #[inline(always)]
    fn home_index(&self, hash: u64) -> usize {
        // Capacity is a power of two, so masking is `hash % capacity`.
        hash as usize & (self.slots.len() - 1)
    }

    /// Walks the probe chain of `key` from its home slot.
    ///
    /// Stops at the first equal key or the first empty slot. When the key is
    /// absent, the first tombstone seen is preferred over the empty slot that
    /// ended the walk.
    fn probe(&self, key: &K, hash: u64) -> Probe {
        let mask = self.slots.len() - 1;
        let mut index = self.home_index(hash);
        let mut reusable = None;

        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(reusable.unwrap_or(index)),
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(index);
                    }
                }
                Slot::Occupied(stored, _) => {
                    if self.equality.keys_equal(stored, key) {
                        return Probe::Found(index);
                    }
                }
            }
            index = (index + 1) & mask;
        }

        reusable.map_or(Probe::Exhausted, Probe::Vacant)
    }

    fn find(&self, key: &K) -> Option<usize> {
        if self.len == 0 {
            if self.trace {
                log::trace!("key not found: table is empty");
            }
            return None;
        }

        match self.probe(key, self.hasher.hash_key(key)) {
            Probe::Found(index) => {
                if self.trace {
                    log::trace!("found key at slot {index}");
                }
                Some(index)
            }
            Probe::Vacant(_) | Probe::Exhausted => {
                if self.trace {
                    log::trace!("key not found");
                }
                None
            }
        }
    }

    /// Inserts `value` under `key`.
    ///
    /// If an equal key is already stored, its value is replaced and the old
    /// value is disposed. The stored key is kept; the `key` passed in is
    /// disposed instead. The length is unchanged in that case.
    ///
    /// Before placing anything, the table grows to twice its capacity if it
    /// is at least 75% full.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKey`] if `key` does not compare equal to itself.
    /// - [`Error::Allocation`] or [`Error::CapacityOverflow`] if a required
    ///   resize fails. The table is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.insert("k", 1).unwrap();
    /// table.insert("k", 2).unwrap();
    /// assert_eq!(table.get(&"k"), Some(&2));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        if let Some(old) = self.replace(key, value)? {
            self.disposer.dispose_value(old);
        }
        Ok(())
    }

    /// Inserts `value` under `key` and hands back the value it replaced.
    ///
    /// Behaves like [`insert`](Self::insert), except that a replaced value is
    /// returned to the caller instead of disposed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// assert_eq!(table.replace("k", 1), Ok(None));
    /// assert_eq!(table.replace("k", 2), Ok(Some(1)));
    /// ```
    pub fn replace(&mut self, key: K, value: V) -> Result<Option<V>> {
        if !self.equality.keys_equal(&key, &key) {
            return Err(Error::InvalidKey);
        }

        let capacity = self.capacity();
        if self.len >= grow_threshold(capacity) {
            self.grow()?;
        } else if self.len + self.tombstones >= grow_threshold(capacity) {
            // Live entries fit, but tombstones are crowding out the empty
            // slots that end probe chains.
            self.resize(capacity)?;
        }

        let hash = self.hasher.hash_key(&key);
        loop {
            match self.probe(&key, hash) {
                Probe::Found(index) => {
                    let Slot::Occupied(_, stored) = &mut self.slots[index] else {
                        unreachable!("probe reported a match in a slot without an entry");
                    };
                    let old = mem::replace(stored, value);
                    self.disposer.dispose_key(key);
                    return Ok(Some(old));
                }
                Probe::Vacant(index) => {
                    if let Slot::Tombstone = self.slots[index] {
                        self.tombstones -= 1;
                    }
                    self.slots[index] = Slot::Occupied(key, value);
                    self.len += 1;
                    return Ok(None);
                }
                Probe::Exhausted => self.grow()?,
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.insert(String::from("k"), 1).unwrap();
    /// assert_eq!(table.get(&String::from("k")), Some(&1));
    /// assert_eq!(table.get(&String::from("missing")), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    ///
    /// The stored key may be a different object than `key`: it is the one
    /// that was inserted first.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match &self.slots[self.find(key)?] {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find(key)?;
        match &mut self.slots[index] {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` if an entry is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry stored under `key` and disposes its key and value.
    ///
    /// The slot becomes a tombstone. If fewer than 25% of the slots remain
    /// occupied, the table then shrinks to half its capacity, but never
    /// below [`min_capacity`](Self::min_capacity). A shrink that fails is
    /// logged and does not fail the removal.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no entry is stored under `key`. Nothing is
    /// changed in that case.
    pub fn remove(&mut self, key: &K) -> Result<()> {
        let (key, value) = self.vacate(key)?;
        self.disposer.dispose_key(key);
        self.disposer.dispose_value(value);
        self.shrink_after_removal();
        Ok(())
    }

    /// Removes the entry stored under `key` and hands it back.
    ///
    /// Behaves like [`remove`](Self::remove), except that the stored key and
    /// value are returned instead of disposed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.insert("k", vec![1, 2]).unwrap();
    /// assert_eq!(table.take(&"k"), Ok(("k", vec![1, 2])));
    /// assert!(table.take(&"k").is_err());
    /// ```
    pub fn take(&mut self, key: &K) -> Result<(K, V)> {
        let entry = self.vacate(key)?;
        self.shrink_after_removal();
        Ok(entry)
    }

    fn vacate(&mut self, key: &K) -> Result<(K, V)> {
        let index = self.find(key).ok_or(Error::NotFound)?;
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(key, value) => {
                self.len -= 1;
                self.tombstones += 1;
                Ok((key, value))
            }
            _ => unreachable!("probe reported a match in a slot without an entry"),
        }
    }

    fn shrink_after_removal(&mut self) {
        let capacity = self.capacity();
        if self.len >= shrink_threshold(capacity) {
            return;
        }

        let target = (capacity / RESIZE_FACTOR).max(self.min_capacity);
        if target == capacity {
            return;
        }

        if let Err(err) = self.resize(target) {
            log::warn!("failed to shrink table from {capacity} to {target} slots: {err}");
        }
    }

    /// Grows the table so that `additional` more entries fit without another
    /// resize.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(0).unwrap();
    /// table.reserve(100).unwrap();
    /// let capacity = table.capacity();
    /// for i in 0..100 {
    ///     table.insert(format!("key{i}"), i).unwrap();
    /// }
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        let target = capacity_for(required, self.capacity())?;
        if target > self.capacity() {
            self.resize(target)?;
        }
        Ok(())
    }

    /// Rebuilds the table at the smallest capacity, no lower than
    /// [`min_capacity`](Self::min_capacity), that keeps the current entries
    /// below the grow threshold. Tombstones are discarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(1000).unwrap();
    /// table.insert("a", 1).unwrap();
    /// table.insert("b", 2).unwrap();
    ///
    /// table.shrink_to_fit().unwrap();
    /// assert_eq!(table.capacity(), 8);
    /// assert_eq!(table.get(&"b"), Some(&2));
    /// ```
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let target = capacity_for(self.len + 1, self.min_capacity)?;
        if target < self.capacity() || self.tombstones > 0 {
            self.resize(target.min(self.capacity()))?;
        }
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let target = self
            .capacity()
            .checked_mul(RESIZE_FACTOR)
            .ok_or(Error::CapacityOverflow)?;
        self.resize(target)
    }

    /// Moves every entry into fresh storage of `new_capacity` slots.
    ///
    /// The new storage is allocated before anything moves, so a failure
    /// leaves the table untouched. Tombstones are dropped and `len` is
    /// recounted from the entries actually moved.
    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let new_capacity = clamp_capacity(new_capacity, self.min_capacity)?;
        debug_assert!(self.len < new_capacity);

        let old_capacity = self.capacity();
        let old_slots = mem::replace(&mut self.slots, allocate_slots(new_capacity)?);

        let mask = new_capacity - 1;
        let mut rehomed = 0;
        for slot in old_slots {
            if let Slot::Occupied(key, value) = slot {
                let mut index = self.home_index(self.hasher.hash_key(&key));
                while let Slot::Occupied(..) = self.slots[index] {
                    index = (index + 1) & mask;
                }
                self.slots[index] = Slot::Occupied(key, value);
                rehomed += 1;
            }
        }

        if self.trace {
            log::debug!(
                "resized from {old_capacity} to {new_capacity} slots, rehomed {rehomed} entries, \
                 discarded {} tombstones",
                self.tombstones
            );
        }

        self.len = rehomed;
        self.tombstones = 0;
        Ok(())
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Requires the `stats` feature.
    ///
    /// The probe length of an entry is the number of slots between its home
    /// slot and the slot it occupies. Index `n` of the returned vector counts
    /// the entries with probe length `n`; the vector is as long as the
    /// longest probe plus one, and empty for an empty table.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mask = self.slots.len() - 1;
        let mut hist = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(key, _) = slot {
                let home = self.home_index(self.hasher.hash_key(key));
                let distance = index.wrapping_sub(home) & mask;
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let slot_bytes = mem::size_of::<Slot<K, V>>();
        DebugStats {
            populated: self.len,
            capacity,
            tombstones: self.tombstones,
            empty_slots: capacity - self.len - self.tombstones,
            load_factor: self.load_factor(),
            max_probe_length: self.probe_histogram().len().saturating_sub(1),
            total_bytes: capacity * slot_bytes,
            wasted_bytes: (capacity - self.len) * slot_bytes,
        }
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(all(feature = "stats", feature = "std"))]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.len);
        for (distance, &count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "#".repeat(width), count);
        }
    }
}

/// Configures and creates a [`HashTable`].
///
/// Created by [`HashTable::builder`]. The table is only built once an
/// equality capability usable with `K` is in place; the default, [`StdEq`],
/// requires `K: Eq`.
pub struct TableBuilder<K, V, H = Djb2, E = StdEq, D = DropDisposer> {
    capacity: usize,
    min_capacity: usize,
    hasher: H,
    equality: E,
    disposer: D,
    trace: bool,
    _phantom: PhantomData<fn(K, V)>,
}

impl<K, V, H, E, D> TableBuilder<K, V, H, E, D> {
    /// Sets the initial capacity. Zero selects [`DEFAULT_CAPACITY`].
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the capacity floor. Defaults to [`DEFAULT_MIN_CAPACITY`].
    ///
    /// The floor is rounded up to a power of two and is at least one.
    pub fn min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Enables or disables diagnostic traces. See [`HashTable::set_trace`].
    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Replaces the key hasher.
    pub fn hasher<H2>(self, hasher: H2) -> TableBuilder<K, V, H2, E, D> {
        TableBuilder {
            capacity: self.capacity,
            min_capacity: self.min_capacity,
            hasher,
            equality: self.equality,
            disposer: self.disposer,
            trace: self.trace,
            _phantom: PhantomData,
        }
    }

    /// Replaces the key equality.
    pub fn equality<E2>(self, equality: E2) -> TableBuilder<K, V, H, E2, D> {
        TableBuilder {
            capacity: self.capacity,
            min_capacity: self.min_capacity,
            hasher: self.hasher,
            equality,
            disposer: self.disposer,
            trace: self.trace,
            _phantom: PhantomData,
        }
    }

    /// Replaces the disposer.
    pub fn disposer<D2>(self, disposer: D2) -> TableBuilder<K, V, H, E, D2> {
        TableBuilder {
            capacity: self.capacity,
            min_capacity: self.min_capacity,
            hasher: self.hasher,
            equality: self.equality,
            disposer,
            trace: self.trace,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, H, E, D> TableBuilder<K, V, H, E, D>
where
    H: KeyHasher<K>,
    E: KeyEquality<K>,
    D: Disposer<K, V>,
{
    /// Allocates the table.
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] if the slot array cannot be allocated, or
    /// [`Error::CapacityOverflow`] if the capacity cannot be represented.
    pub fn build(self) -> Result<HashTable<K, V, H, E, D>> {
        let min_capacity = clamp_capacity(self.min_capacity, 1)?;
        let requested = if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.capacity
        };
        let capacity = clamp_capacity(requested, min_capacity)?;

        if self.trace {
            log::debug!("creating table with {capacity} slots (floor {min_capacity})");
        }

        Ok(HashTable {
            slots: allocate_slots(capacity)?,
            len: 0,
            tombstones: 0,
            min_capacity,
            hasher: self.hasher,
            equality: self.equality,
            disposer: self.disposer,
            trace: self.trace,
        })
    }
}

impl<'a, K, V, H, E, D> IntoIterator for &'a HashTable<K, V, H, E, D>
where
    D: Disposer<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H, E, D> IntoIterator for &'a mut HashTable<K, V, H, E, D>
where
    D: Disposer<K, V>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. Entries
/// are visited from slot 0 upward; tombstones and empty slots are skipped.
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied(k, v) = slot {
                self.remaining -= 1;
                return Some((k, v));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied(k, v) = slot {
                self.remaining -= 1;
                return Some((&*k, v));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a [`HashTable`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. It
/// yields owned entries and resets each slot to empty as it goes.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    len: &'a mut usize,
    tombstones: &'a mut usize,
}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            match mem::replace(slot, Slot::Empty) {
                Slot::Empty => {}
                Slot::Tombstone => *self.tombstones -= 1,
                Slot::Occupied(k, v) => {
                    *self.len -= 1;
                    return Some((k, v));
                }
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.len, Some(*self.len))
    }
}
