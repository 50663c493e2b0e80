use alloc::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by [`HashTable`](crate::HashTable) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Backing storage for `capacity` slots could not be reserved.
    ///
    /// Returned by construction and by any operation that had to resize. The
    /// table is left exactly as it was before the failed call.
    #[error("failed to allocate storage for {capacity} slots")]
    Allocation {
        /// Slot count that was requested.
        capacity: usize,
        /// Error reported by the allocator.
        #[source]
        source: TryReserveError,
    },

    /// The requested capacity does not fit in a `usize` once rounded up to a
    /// power of two.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The key does not compare equal to itself, so it could never be found
    /// again once stored.
    #[error("key is not equal to itself")]
    InvalidKey,

    /// No entry with an equal key is stored in the table.
    #[error("key not found")]
    NotFound,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
