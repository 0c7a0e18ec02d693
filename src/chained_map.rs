use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

use crate::{cursor::Cursor, error::MapError};

/// Bucket count used by [`ChainedMap::new`] and the `Default`/`FromIterator`
/// constructors.
pub(crate) const DEFAULT_BUCKETS: usize = 16;

/// A single entry in a collision chain.
///
/// Entries live in the slot arena and link to each other by handle, so a
/// chain is walked without touching any other bucket.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    /// The key; never mutated for the lifetime of the entry.
    pub(crate) key: K,
    /// The mapped value.
    pub(crate) value: V,
    /// Handle of the next entry in the same chain.
    pub(crate) next: Option<usize>,
}

/// A hash map using separate chaining over a fixed bucket table.
///
/// Keys are spread over the table by `hash(key) % bucket_count`, and keys
/// that land in the same bucket form a singly linked chain with the most
/// recently inserted entry at the front. The table never grows on its own;
/// the bucket count is set at construction and only changes through an
/// explicit [`rehash`](Self::rehash).
///
/// Entries are stored in a slot arena addressed by handle. Erasing an entry
/// vacates its slot without moving any other entry, which is what lets a
/// [`Cursor`] stay valid while unrelated entries come and go.
///
/// Note: this implementation is not thread-safe. Callers that share a map
/// across threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct ChainedMap<K, V, S = RandomState> {
    /// Handle of the first entry of each bucket's chain.
    heads: Vec<Option<usize>>,
    /// Slot arena; erased slots hold `None` and are listed in `free`.
    slots: Vec<Option<Node<K, V>>>,
    /// Handles of vacant slots available for reuse.
    free: Vec<usize>,
    /// Number of live entries.
    len: usize,
    /// Hasher builder used to place keys into buckets.
    build_hasher: S,
}

impl<K, V> ChainedMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map with the default bucket count and hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Creates an empty map with the given bucket count and the default
    /// hasher. A requested count of zero is bumped to one.
    #[must_use]
    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_buckets_and_hasher(buckets, RandomState::new())
    }
}

impl<K, V, S> ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty map with the default bucket count and the given
    /// hasher builder.
    pub fn with_hasher(build_hasher: S) -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, build_hasher)
    }

    /// Creates an empty map with the given bucket count and hasher builder.
    /// A requested count of zero is bumped to one.
    pub fn with_buckets_and_hasher(buckets: usize, build_hasher: S) -> Self {
        Self {
            heads: vec![None; buckets.max(1)],
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            build_hasher,
        }
    }

    /// Hashes `key` and reduces it modulo `buckets`.
    ///
    /// `buckets` is never zero: construction clamps it and `rehash` rejects
    /// zero before calling this.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn bucket_index<Q>(&self, key: &Q, buckets: usize) -> usize
    where
        Q: Hash + ?Sized,
    {
        let mut hasher = self.build_hasher.build_hasher();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % buckets
    }

    /// Bucket index of `key` under the current table.
    fn bucket_for<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        self.bucket_index(key, self.heads.len())
    }

    /// Walks `bucket`'s chain for `key`, returning the preceding handle and
    /// the matching handle. The preceding handle is `None` when the match
    /// heads the chain.
    fn chain_locate<Q>(&self, bucket: usize, key: &Q) -> Option<(Option<usize>, usize)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut prev = None;
        let mut cur = self.head_of(bucket);
        while let Some(idx) = cur {
            let node = self.node(idx)?;
            if node.key.borrow() == key {
                return Some((prev, idx));
            }
            prev = Some(idx);
            cur = node.next;
        }
        None
    }

    /// Returns whether the map holds an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value mapped to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_for(key);
        let (_, idx) = self.chain_locate(bucket, key)?;
        self.node(idx).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value mapped to `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_for(key);
        let (_, idx) = self.chain_locate(bucket, key)?;
        self.node_mut(idx).map(|node| &mut node.value)
    }

    /// Checked access to the value mapped to `key`. Never inserts.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] when the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Checked mutable access to the value mapped to `key`. Never inserts.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] when the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    /// Inserts `key`/`value` if the key is absent, prepending the new entry
    /// to its bucket's chain.
    ///
    /// Returns a cursor at the stored entry and whether an insertion took
    /// place. When the key is already present the call is a no-op and the
    /// existing value is kept.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let bucket = self.bucket_for(&key);
        if let Some((_, idx)) = self.chain_locate(bucket, &key) {
            return (Cursor::at(bucket, idx), false);
        }
        let idx = self.attach(bucket, key, value);
        (Cursor::at(bucket, idx), true)
    }

    /// Returns the value mapped to `key`, inserting `V::default()` first
    /// when the key is absent.
    #[allow(clippy::missing_panics_doc)]
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let bucket = self.bucket_for(&key);
        let idx = match self.chain_locate(bucket, &key) {
            Some((_, idx)) => idx,
            None => self.attach(bucket, key, V::default()),
        };
        match self.node_mut(idx) {
            Some(node) => &mut node.value,
            // a located or freshly attached handle always holds a node
            None => unreachable!("handle {idx} is vacant"),
        }
    }

    /// Links a fresh entry at the front of `bucket`'s chain and returns its
    /// handle, reusing a vacant slot when one is available.
    fn attach(&mut self, bucket: usize, key: K, value: V) -> usize {
        let next = self.head_of(bucket);
        let node = Node { key, value, next };
        let idx = match self.free.pop() {
            Some(idx) => {
                if let Some(slot) = self.slots.get_mut(idx) {
                    *slot = Some(node);
                }
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len().saturating_sub(1)
            }
        };
        if let Some(head) = self.heads.get_mut(bucket) {
            *head = Some(idx);
        }
        self.len = self.len.saturating_add(1);
        idx
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// Only the removed entry's slot is vacated; every other entry, and any
    /// cursor denoting one, is left untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_for(key);
        let (prev, idx) = self.chain_locate(bucket, key)?;
        self.unlink(bucket, prev, idx)
    }

    /// Rebuilds the bucket table at `buckets` buckets, relinking every live
    /// entry by its recomputed bucket index.
    ///
    /// Entry slots are reused in place; no entry is constructed, moved, or
    /// dropped, and the element count is unchanged. Existing cursors must be
    /// considered invalidated since chains are rewired wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ZeroBuckets`] when `buckets` is zero, leaving the
    /// map untouched.
    pub fn rehash(&mut self, buckets: usize) -> Result<(), MapError> {
        if buckets == 0 {
            return Err(MapError::ZeroBuckets);
        }
        let mut heads: Vec<Option<usize>> = vec![None; buckets];
        for idx in 0..self.slots.len() {
            let bucket = match self.node(idx) {
                Some(node) => self.bucket_index(&node.key, buckets),
                None => continue,
            };
            if let Some(node) = self.node_mut(idx) {
                node.next = heads.get(bucket).copied().flatten();
            }
            if let Some(head) = heads.get_mut(bucket) {
                *head = Some(idx);
            }
        }
        self.heads = heads;
        Ok(())
    }

    /// Returns a cursor at the entry for `key`, or the end cursor when the
    /// key is absent.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_for(key);
        match self.chain_locate(bucket, key) {
            Some((_, idx)) => Cursor::at(bucket, idx),
            None => self.end(),
        }
    }
}

impl<K, V, S> ChainedMap<K, V, S> {
    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current bucket count.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Returns the entry count divided by the bucket count.
    ///
    /// Purely a density signal; nothing in the map acts on it.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.heads.len() as f64
    }

    /// Drops every entry and resets the count to zero. The bucket count is
    /// preserved.
    pub fn clear(&mut self) {
        for head in &mut self.heads {
            *head = None;
        }
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Returns an iterator over the entries in bucket order, front of chain
    /// first within each bucket.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut bucket = 0;
        let mut node = None;
        while bucket < self.heads.len() {
            node = self.head_of(bucket);
            if node.is_some() {
                break;
            }
            bucket = bucket.saturating_add(1);
        }
        Iter { heads: &self.heads, slots: &self.slots, bucket, node }
    }

    /// Returns a [`Display`](fmt::Display) adapter that renders the bucket
    /// table, chain by chain, together with the size, bucket count, and load
    /// factor. The format is for human eyes only and is not stable.
    #[must_use]
    pub fn dump(&self) -> TableDump<'_, K, V, S> {
        TableDump { map: self }
    }

    /// Head handle of `bucket`'s chain.
    pub(crate) fn head_of(&self, bucket: usize) -> Option<usize> {
        self.heads.get(bucket).copied().flatten()
    }

    /// Borrows the node at `idx`, if the slot is occupied.
    pub(crate) fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Mutably borrows the node at `idx`, if the slot is occupied.
    pub(crate) fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Looks for `idx` in `bucket`'s chain, returning the preceding handle
    /// when found. `Some(None)` means `idx` heads the chain.
    pub(crate) fn chain_seek(&self, bucket: usize, idx: usize) -> Option<Option<usize>> {
        let mut prev = None;
        let mut cur = self.head_of(bucket);
        while let Some(i) = cur {
            if i == idx {
                return Some(prev);
            }
            prev = Some(i);
            cur = self.node(i).and_then(|node| node.next);
        }
        None
    }

    /// Unlinks the entry at `idx` from `bucket`'s chain, vacates its slot,
    /// and returns the value. `prev` must be the handle preceding `idx` in
    /// the chain, or `None` when `idx` heads it.
    pub(crate) fn unlink(&mut self, bucket: usize, prev: Option<usize>, idx: usize) -> Option<V> {
        let next = self.node(idx).and_then(|node| node.next);
        match prev {
            Some(prev_idx) => {
                if let Some(node) = self.node_mut(prev_idx) {
                    node.next = next;
                }
            }
            None => {
                if let Some(head) = self.heads.get_mut(bucket) {
                    *head = next;
                }
            }
        }
        let removed = self.slots.get_mut(idx).and_then(Option::take)?;
        self.free.push(idx);
        self.len = self.len.saturating_sub(1);
        Some(removed.value)
    }
}

impl<K, V, S> Default for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Inserts every pair in order. Pairs whose key is already present are
    /// skipped, so the first occurrence of a key wins.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ChainedMap<K, V>
where
    K: Eq + Hash,
{
    /// Builds a map from a fixed list of pairs; the first occurrence of a
    /// duplicated key wins.
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two maps are equal when they are the same size and every entry of one has
/// a matching key with an equal value in the other. Bucket counts and hasher
/// builders take no part in the comparison.
impl<K, V, S> PartialEq for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V, S> Eq for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

/// Renders the map as `{k:v, k:v, ...}` in iteration order, which is bucket
/// order and then chain order, not insertion order.
impl<K, V, S> fmt::Display for ChainedMap<K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut sep = "";
        for (key, value) in self {
            write!(f, "{sep}{key}:{value}")?;
            sep = ", ";
        }
        write!(f, "}}")
    }
}

/// Iterator over the entries of a [`ChainedMap`], in bucket order and then
/// chain order.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Bucket heads of the map being walked.
    heads: &'a [Option<usize>],
    /// Slot arena of the map being walked.
    slots: &'a [Option<Node<K, V>>],
    /// Bucket holding the entry to yield next.
    bucket: usize,
    /// Handle of the entry to yield next; `None` once exhausted.
    node: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.node?;
        let node = self.slots.get(idx).and_then(Option::as_ref)?;
        self.node = node.next;
        while self.node.is_none() {
            self.bucket = self.bucket.saturating_add(1);
            match self.heads.get(self.bucket) {
                Some(head) => self.node = *head,
                None => break,
            }
        }
        Some((&node.key, &node.value))
    }
}

/// Borrowed diagnostic rendering of a map's bucket table, produced by
/// [`ChainedMap::dump`].
#[derive(Debug, Clone)]
pub struct TableDump<'a, K, V, S> {
    /// The map being rendered.
    map: &'a ChainedMap<K, V, S>,
}

impl<K, V, S> fmt::Display for TableDump<'_, K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:-<40}", "")?;
        writeln!(
            f,
            "Size: {}    Buckets: {}    (load factor: {:.2})",
            self.map.len(),
            self.map.bucket_count(),
            self.map.load_factor()
        )?;
        writeln!(f)?;
        for bucket in 0..self.map.bucket_count() {
            write!(f, "[{bucket:>3}]:")?;
            let mut cur = self.map.head_of(bucket);
            while let Some(idx) = cur {
                match self.map.node(idx) {
                    Some(node) => {
                        write!(f, " -> {}:{}", node.key, node.value)?;
                        cur = node.next;
                    }
                    None => break,
                }
            }
            writeln!(f, " /")?;
        }
        write!(f, "{:-<40}", "")
    }
}
