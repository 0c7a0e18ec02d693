//! # Chainmap
//!
//! A Rust implementation of a hash map using separate chaining over a fixed
//! bucket table.
//!
//! This crate provides one container, [`ChainedMap`], with two ways to walk
//! it:
//!
//! - `Iter`: a borrowing iterator in bucket order, obtained from
//!   [`ChainedMap::iter`]
//! - [`Cursor`]: a detached position that holds no borrow, survives
//!   mutations of other entries, and supports erase-and-continue
//!
//! The bucket count never changes behind the caller's back: it is fixed at
//! construction and only moves through an explicit
//! [`rehash`](ChainedMap::rehash), which relinks the existing entries in
//! place. Colliding keys chain within their bucket, most recently inserted
//! first.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chainmap::ChainedMap;
//!
//! // Create a new map
//! let mut map = ChainedMap::new();
//!
//! // Insert values
//! map.insert("apple".to_string(), 1);
//! map.insert("banana".to_string(), 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Inserting an existing key keeps the stored value
//! let (_, inserted) = map.insert("apple".to_string(), 10);
//! assert!(!inserted);
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Cursor Usage
//!
//! ```rust
//! use chainmap::ChainedMap;
//!
//! let mut map = ChainedMap::with_buckets(8);
//! map.insert(1_u32, "one");
//! map.insert(2, "two");
//! map.insert(3, "three");
//!
//! // Walk the map, erasing odd keys and continuing from the cursor the
//! // erase hands back
//! let mut cursor = map.begin();
//! while let Ok((&key, _)) = map.entry_at(cursor) {
//!     if key % 2 == 1 {
//!         cursor = map.erase_at(cursor);
//!     } else {
//!         cursor = map.advance(cursor);
//!     }
//! }
//!
//! assert_eq!(cursor, map.end());
//! assert_eq!(map.len(), 1);
//! assert!(map.contains_key(&2));
//! ```
//!
//! ## Explicit Rehashing
//!
//! ```rust
//! use chainmap::{ChainedMap, MapError};
//!
//! let mut map: ChainedMap<u32, u32> = (0..100).map(|i| (i, i * i)).collect();
//!
//! // The table holds its bucket count until told otherwise
//! assert_eq!(map.bucket_count(), 16);
//! assert!(map.load_factor() > 6.0);
//!
//! map.rehash(128).unwrap();
//! assert_eq!(map.bucket_count(), 128);
//! assert_eq!(map.get(&30), Some(&900));
//!
//! // A zero bucket count is refused before anything is touched
//! assert_eq!(map.rehash(0), Err(MapError::ZeroBuckets));
//! assert_eq!(map.bucket_count(), 128);
//! ```

/// Module implementing the separate-chaining map and its borrowing iterator
mod chained_map;
/// Module implementing detached cursors over the map
mod cursor;
/// Module defining the typed failure conditions
mod error;
/// Utility extensions over the core map API
mod utils;

pub use chained_map::{ChainedMap, Iter, TableDump};
pub use cursor::Cursor;
pub use error::MapError;
pub use utils::MapExtensions;
