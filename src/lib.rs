#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Hashing, equality, and disposal capabilities a table is built from.
pub mod capability;

mod error;

/// A `std`-style hash map backed by [`HashTable`].
///
/// This module provides a `HashMap` that wraps the `HashTable` and hashes
/// keys through a configurable [`BuildHasher`](core::hash::BuildHasher).
pub mod hash_map;

/// A hash set backed by [`HashTable`].
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub mod hash_table;

pub use capability::Disposer;
pub use capability::Disposers;
pub use capability::Djb2;
pub use capability::DropDisposer;
pub use capability::KeyEquality;
pub use capability::KeyHasher;
pub use capability::StdEq;
pub use capability::StdHash;
pub use error::Error;
pub use error::Result;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hash_table::TableBuilder;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hash builder used by [`HashMap::new`] and [`HashSet::new`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hash builder used by [`HashMap::new`] and [`HashSet::new`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
