use crate::{chained_map::ChainedMap, error::MapError};

/// A detached position within a [`ChainedMap`].
///
/// A cursor is a plain (bucket, handle) pair: it borrows nothing from the
/// map, so it can be held across mutations and is dereferenced through the
/// map that produced it. The end position, one past the last entry, is
/// reported by [`ChainedMap::end`] and recognized with [`is_end`](Self::is_end).
///
/// Stability: a cursor stays valid while other entries are inserted or
/// erased. Erasing the entry a cursor denotes leaves that cursor stale, and
/// dereferencing it reports [`MapError::InvalidCursor`]; continue from the
/// cursor returned by [`ChainedMap::erase_at`] instead. A
/// [`rehash`](ChainedMap::rehash) or [`clear`](ChainedMap::clear)
/// invalidates every cursor but end.
///
/// Cursors carry no marker tying them to a particular map instance. Using a
/// cursor with a map other than the one that produced it is never unsafe,
/// but the result is meaningless.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    /// Bucket index the cursor is parked at.
    pub(crate) bucket: usize,
    /// Slot handle of the denoted entry; `None` marks the end position.
    pub(crate) node: Option<usize>,
}

impl Cursor {
    /// Cursor at the entry stored in slot `idx` of `bucket`'s chain.
    pub(crate) fn at(bucket: usize, idx: usize) -> Self {
        Self { bucket, node: Some(idx) }
    }

    /// End cursor parked just past `bucket`.
    pub(crate) fn end_at(bucket: usize) -> Self {
        Self { bucket, node: None }
    }

    /// Returns whether the cursor sits at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

/// End cursors compare equal no matter where they were derived; two non-end
/// cursors compare equal exactly when they denote the same entry slot.
impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Cursor {}

impl<K, V, S> ChainedMap<K, V, S> {
    /// Cursor at the first entry in iteration order, or the end cursor when
    /// the map is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.first_from(0)
    }

    /// The one-past-last sentinel cursor.
    #[must_use]
    pub fn end(&self) -> Cursor {
        Cursor::end_at(self.bucket_count())
    }

    /// Cursor at the first entry whose bucket index is `bucket` or greater.
    fn first_from(&self, bucket: usize) -> Cursor {
        let mut bucket = bucket;
        while bucket < self.bucket_count() {
            if let Some(idx) = self.head_of(bucket) {
                return Cursor::at(bucket, idx);
            }
            bucket = bucket.saturating_add(1);
        }
        self.end()
    }

    /// Steps `cursor` to its successor: the next entry in its chain, else
    /// the head of the next non-empty bucket, else end.
    ///
    /// Advancing the end cursor, or a cursor whose entry has been erased,
    /// yields end.
    #[must_use]
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        let Some(idx) = cursor.node else {
            return self.end();
        };
        match self.node(idx) {
            Some(node) => match node.next {
                Some(next) => Cursor::at(cursor.bucket, next),
                None => self.first_from(cursor.bucket.saturating_add(1)),
            },
            None => self.end(),
        }
    }

    /// Borrows the key and value of the entry `cursor` denotes.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] for the end cursor or a cursor
    /// whose entry has been erased.
    pub fn entry_at(&self, cursor: Cursor) -> Result<(&K, &V), MapError> {
        cursor
            .node
            .and_then(|idx| self.node(idx))
            .map(|node| (&node.key, &node.value))
            .ok_or(MapError::InvalidCursor)
    }

    /// Mutably borrows the value of the entry `cursor` denotes.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidCursor`] for the end cursor or a cursor
    /// whose entry has been erased.
    pub fn value_at_mut(&mut self, cursor: Cursor) -> Result<&mut V, MapError> {
        cursor
            .node
            .and_then(|idx| self.node_mut(idx))
            .map(|node| &mut node.value)
            .ok_or(MapError::InvalidCursor)
    }

    /// Erases the entry `cursor` denotes and returns the cursor its
    /// successor held before the removal, so a forward walk can continue
    /// without revisiting or skipping anything.
    ///
    /// Erasing the end cursor, or a cursor whose entry is already gone, is a
    /// no-op that returns end.
    pub fn erase_at(&mut self, cursor: Cursor) -> Cursor {
        let Some(idx) = cursor.node else {
            return self.end();
        };
        let Some(prev) = self.chain_seek(cursor.bucket, idx) else {
            return self.end();
        };
        let successor = self.advance(cursor);
        let _removed = self.unlink(cursor.bucket, prev, idx);
        successor
    }

    /// Erases every entry in `[first, last)` and returns the position
    /// following the last erased entry.
    ///
    /// When `last` is not reachable from `first` the walk drains to the end
    /// of the map.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        let mut cursor = first;
        while cursor != last && !cursor.is_end() {
            cursor = self.erase_at(cursor);
        }
        cursor
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ChainedMap, MapError,
        chained_map::tests::{IdentityState, collision_map},
    };

    #[test]
    fn begin_equals_end_on_an_empty_map() {
        let map: ChainedMap<u32, ()> = ChainedMap::new();
        assert_eq!(map.begin(), map.end());
        assert!(map.begin().is_end());
    }

    #[test]
    fn cursor_walk_matches_iteration_order() {
        let map = collision_map();

        let mut walked = Vec::new();
        let mut cursor = map.begin();
        while let Ok((key, value)) = map.entry_at(cursor) {
            walked.push((*key, *value));
            cursor = map.advance(cursor);
        }
        assert_eq!(cursor, map.end());

        let iterated: Vec<(u64, &str)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(walked, iterated);
        assert_eq!(walked.len(), map.len());
    }

    #[test]
    fn end_cursor_does_not_dereference() {
        let map = collision_map();
        assert_eq!(map.entry_at(map.end()), Err(MapError::InvalidCursor));

        let mut map = map;
        let end = map.end();
        assert_eq!(map.value_at_mut(end), Err(MapError::InvalidCursor));
    }

    #[test]
    fn advancing_the_end_cursor_stays_at_end() {
        let map = collision_map();
        assert_eq!(map.advance(map.end()), map.end());
    }

    #[test]
    fn end_cursors_compare_equal_from_any_derivation() {
        let mut map = collision_map();

        // walk one cursor off the last entry, take the other from end()
        let mut walked = map.begin();
        for _ in 0..map.len() {
            walked = map.advance(walked);
        }
        assert_eq!(walked, map.end());

        // an end cursor minted before a rehash still equals the new end
        let stale_end = map.end();
        assert_eq!(map.rehash(9), Ok(()));
        assert_eq!(stale_end, map.end());
    }

    #[test]
    fn value_at_mut_edits_in_place() {
        let mut map: ChainedMap<u32, u32> = ChainedMap::new();
        let (cursor, _) = map.insert(1, 10);

        if let Ok(value) = map.value_at_mut(cursor) {
            *value += 5;
        }
        assert_eq!(map.get(&1), Some(&15));
    }

    #[test]
    fn find_locates_entries_or_returns_end() {
        let map = collision_map();

        let hit = map.find(&5);
        assert_eq!(map.entry_at(hit), Ok((&5, &"b")));

        let miss = map.find(&42);
        assert_eq!(miss, map.end());
    }

    #[test]
    fn erase_at_returns_the_prior_successor() {
        let mut map = collision_map();

        // iteration order is (5, 1, 2); erase the chain head at key 5
        let at_five = map.find(&5);
        let next = map.erase_at(at_five);

        assert_eq!(map.entry_at(next), Ok((&1, &"a")));
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key(&5));
    }

    #[test]
    fn erase_at_mid_chain_skips_to_the_next_bucket() {
        let mut map = collision_map();

        // key 1 is the last entry of bucket 1, so its successor lives in bucket 2
        let at_one = map.find(&1);
        let next = map.erase_at(at_one);

        assert_eq!(map.entry_at(next), Ok((&2, &"c")));
        assert_eq!(map.get(&5), Some(&"b"));
    }

    #[test]
    fn erase_at_end_is_a_noop() {
        let mut map = collision_map();
        let next = map.erase_at(map.end());

        assert_eq!(next, map.end());
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn erased_cursors_go_stale_without_disturbing_others() {
        let mut map = collision_map();
        let at_five = map.find(&5);
        let at_two = map.find(&2);

        map.erase_at(at_five);

        assert_eq!(map.entry_at(at_five), Err(MapError::InvalidCursor));
        assert_eq!(map.advance(at_five), map.end());
        assert_eq!(map.entry_at(at_two), Ok((&2, &"c")));
    }

    #[test]
    fn erasing_a_stale_cursor_is_a_noop() {
        let mut map = collision_map();
        let at_five = map.find(&5);
        map.erase_at(at_five);

        let next = map.erase_at(at_five);
        assert_eq!(next, map.end());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn cursors_survive_unrelated_mutations() {
        let mut map: ChainedMap<u64, &str, IdentityState> =
            ChainedMap::with_buckets_and_hasher(4, IdentityState::default());
        map.insert(1, "a");
        map.insert(2, "b");

        let at_two = map.find(&2);

        // grow bucket 1's chain and then shrink it again
        map.insert(5, "e");
        map.remove(&1);

        assert_eq!(map.entry_at(at_two), Ok((&2, &"b")));
    }

    #[test]
    fn erase_range_drains_the_span() {
        let mut map = collision_map();

        // erase [begin, find(2)), leaving only key 2
        let stop = map.find(&2);
        let next = map.erase_range(map.begin(), stop);

        assert_eq!(next, stop);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&2), Some(&"c"));
    }

    #[test]
    fn erase_range_to_end_empties_the_map() {
        let mut map = collision_map();
        let first = map.begin();
        let last = map.end();

        let next = map.erase_range(first, last);

        assert_eq!(next, map.end());
        assert!(map.is_empty());
    }

    #[test]
    fn erase_range_of_nothing_erases_nothing() {
        let mut map = collision_map();
        let begin = map.begin();

        let next = map.erase_range(begin, begin);

        assert_eq!(next, begin);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn insert_returns_a_cursor_at_the_stored_entry() {
        let mut map: ChainedMap<u32, &str> = ChainedMap::new();
        let (cursor, inserted) = map.insert(3, "three");

        assert!(inserted);
        assert_eq!(map.entry_at(cursor), Ok((&3, &"three")));
    }
}
