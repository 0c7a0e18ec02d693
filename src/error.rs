//! Typed failure conditions for map operations.

use thiserror::Error;

/// Errors reported by the fallible operations of
/// [`ChainedMap`](crate::ChainedMap).
///
/// Every fallible operation validates its input before touching the table,
/// so an `Err` always leaves the map exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// A checked lookup found no entry for the requested key.
    ///
    /// Callers that cannot tolerate this should probe with
    /// [`contains_key`](crate::ChainedMap::contains_key) or
    /// [`find`](crate::ChainedMap::find) first.
    #[error("key not found")]
    KeyNotFound,

    /// A rehash was requested with a bucket count of zero.
    #[error("bucket count must be greater than zero")]
    ZeroBuckets,

    /// A cursor was dereferenced at the end position, or after the entry it
    /// denoted was erased.
    ///
    /// This signals incorrect iteration bounds in the caller rather than a
    /// condition worth recovering from.
    #[error("cursor does not denote a live entry")]
    InvalidCursor,
}
