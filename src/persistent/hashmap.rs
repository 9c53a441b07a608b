//! Persistent (immutable) hash map based on HAMT.
//!
//! This module provides [`PersistentHashMap`], an immutable hash map
//! that uses structural sharing for efficient updates.
//!
//! # Overview
//!
//! `PersistentHashMap` is based on the Hash Array Mapped Trie (HAMT) data
//! structure. It provides O(log32 N) operations for get, insert, remove and
//! the update family, and O(1) `len`.
//!
//! All operations return new maps without modifying the original,
//! and structural sharing ensures memory efficiency.
//!
//! # Iteration order
//!
//! Entries come out in canonical trie order: slot order within each branch,
//! insertion order within a collision run. The order is deterministic for a
//! given set of keys and hasher, but it is not insertion order.
//!
//! # Examples
//!
//! ```rust
//! use persistent_map::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2)
//!     .insert("three".to_string(), 3);
//!
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(map.get("two"), Some(&2));
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(updated.get("one"), Some(&100));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use super::ReferenceCounter;
use super::hashset::PersistentHashSet;
use super::node::{Node, NodeIter, NodeRef, SharedSubtrees, compute_hash};
use crate::error::MapError;
use crate::traversal::{self, EntrySequence};

// =============================================================================
// PersistentHashMap Definition
// =============================================================================

/// A persistent (immutable) hash map based on HAMT.
///
/// `PersistentHashMap` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log32 N)        |
/// | `insert`       | O(log32 N)        |
/// | `remove`       | O(log32 N)        |
/// | `contains_key` | O(log32 N)        |
/// | `merge`        | O(M log32 N)      |
/// | `map_values`   | O(N)              |
/// | `len`          | O(1)              |
/// | `is_empty`     | O(1)              |
///
/// # Examples
///
/// ```rust
/// use persistent_map::persistent::PersistentHashMap;
///
/// let map = PersistentHashMap::singleton("key".to_string(), 42);
/// assert_eq!(map.get("key"), Some(&42));
/// ```
pub struct PersistentHashMap<K, V> {
    /// Root node of the trie
    root: NodeRef<K, V>,
    /// Number of entries
    length: usize,
}

impl<K, V> Clone for PersistentHashMap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
        }
    }
}

impl<K, V> PersistentHashMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::empty(),
            length: 0,
        }
    }

    fn from_root(root: NodeRef<K, V>) -> Self {
        let length = root.len();
        Self { root, length }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let empty: PersistentHashMap<String, i32> = PersistentHashMap::new();
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = empty.insert("key".to_string(), 42);
    /// assert!(!non_empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an empty map, whatever this one holds.
    #[inline]
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Returns `true` when both maps share the same root node.
    ///
    /// Pointer-equal maps are always equal. The converse does not hold:
    /// equal maps built independently have different roots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton(1, "one");
    /// let copy = map.clone();
    /// assert!(map.ptr_eq(&copy));
    /// assert!(!map.ptr_eq(&map.insert(2, "two")));
    /// ```
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.root, &other.root)
    }

    /// Returns an iterator over key-value pairs in canonical order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{}: {}", key, value);
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentHashMapIterator<'_, K, V> {
        PersistentHashMapIterator {
            inner: self.root.iter(),
        }
    }

    /// Returns an iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values.
    ///
    /// Each call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    ///
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 3);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Calls `action` on every entry in canonical order.
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self {
            action(key, value);
        }
    }

    /// Calls `action` on the first entry, if any, and returns this map.
    #[must_use]
    pub fn peek<F>(&self, action: F) -> Self
    where
        F: FnOnce(&K, &V),
    {
        if let Some((key, value)) = self.iter().next() {
            action(key, value);
        }
        self.clone()
    }

    /// Applies `function` to the whole map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton("a", 1);
    /// let summary = map.transform(|map| format!("{} entries", map.len()));
    /// assert_eq!(summary, "1 entries");
    /// ```
    pub fn transform<U, F>(&self, function: F) -> U
    where
        F: FnOnce(&Self) -> U,
    {
        function(self)
    }
}

impl<K: Hash + Eq, V> PersistentHashMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_entry(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`.
    fn get_entry<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.root.lookup(key, compute_hash(key), 0)
    }

    /// Returns the value for `key`, treating the map as a partial function.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] when the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::MapError;
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton("a".to_string(), 1);
    /// assert_eq!(map.apply("a"), Ok(&1));
    /// assert_eq!(map.apply("z"), Err(MapError::KeyNotFound));
    /// ```
    pub fn apply<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns `true` if the map contains the specified key.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_entry(key).is_some()
    }

    /// Returns `true` if any entry holds `value`.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|candidate| candidate == value)
    }

    /// Returns `true` if the map holds exactly this key-value pair.
    #[must_use]
    pub fn contains(&self, (key, value): &(K, V)) -> bool
    where
        V: PartialEq,
    {
        self.get(key) == Some(value)
    }
}

impl<K: Clone + Hash + Eq, V: Clone> PersistentHashMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Arguments
    ///
    /// * `key` - The key
    /// * `value` - The value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton("key".to_string(), 42);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get("key"), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns a new map with the key-value pair inserted. If the key
    /// already exists, the value is replaced.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    /// * `value` - The value to associate with the key
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map1 = PersistentHashMap::new().insert("key".to_string(), 1);
    /// let map2 = map1.insert("key".to_string(), 2);
    ///
    /// assert_eq!(map1.get("key"), Some(&1)); // Original unchanged
    /// assert_eq!(map2.get("key"), Some(&2)); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = compute_hash(&key);
        let (root, added) = Node::insert(&self.root, key, hash, value);
        Self {
            root,
            length: self.length + usize::from(added),
        }
    }

    /// Inserts a key-value pair given as a tuple.
    #[inline]
    #[must_use]
    pub fn insert_entry(&self, (key, value): (K, V)) -> Self {
        self.insert(key, value)
    }

    /// Removes a key from the map.
    ///
    /// Returns a new map without the specified key. If the key doesn't
    /// exist, the returned map shares its root with this one.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// let removed = map.remove("a");
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get("a"), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match Node::remove(&self.root, key, compute_hash(key), 0) {
            Some(root) => Self {
                root,
                length: self.length - 1,
            },
            None => self.clone(),
        }
    }

    /// Removes every key in `keys`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// let remaining = map.remove_all(&[1, 3, 9]);
    /// assert_eq!(remaining.len(), 1);
    /// assert!(remaining.contains_key(&2));
    /// ```
    #[must_use]
    pub fn remove_all<'q, Q, I>(&self, keys: I) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        keys.into_iter()
            .fold(self.clone(), |map, key| map.remove(key))
    }

    /// Updates the value for a key using a function.
    ///
    /// If the key exists, applies the function to the value and returns
    /// a new map with the updated value. If the key doesn't exist,
    /// returns `None`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to update
    /// * `function` - A function that takes the current value and returns the new value
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("count".to_string(), 10);
    /// let updated = map.update("count", |value| value + 1);
    ///
    /// assert_eq!(updated.unwrap().get("count"), Some(&11));
    /// assert!(map.update("missing", |value| value + 1).is_none());
    /// ```
    #[must_use]
    pub fn update<Q, F>(&self, key: &Q, function: F) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> V,
    {
        let hash = compute_hash(key);
        let (stored_key, value) = self.root.lookup(key, hash, 0)?;
        let (root, _) = Node::insert(&self.root, stored_key.clone(), hash, function(value));
        Some(Self {
            root,
            length: self.length,
        })
    }

    /// Updates, inserts or removes the entry for `key` in one step.
    ///
    /// `updater` receives the current value (or `None`) and returns the new
    /// value (or `None` to remove the entry).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("count".to_string(), 10);
    ///
    /// // Increment existing value
    /// let updated = map.update_with("count", |maybe_value| {
    ///     maybe_value.map(|value| value + 1)
    /// });
    /// assert_eq!(updated.get("count"), Some(&11));
    ///
    /// // Insert if not exists
    /// let inserted = map.update_with("new_key", |maybe_value| {
    ///     Some(maybe_value.copied().unwrap_or(100))
    /// });
    /// assert_eq!(inserted.get("new_key"), Some(&100));
    ///
    /// // Remove by returning None
    /// let removed = map.update_with("count", |_| None);
    /// assert_eq!(removed.get("count"), None);
    /// ```
    #[must_use]
    pub fn update_with<Q, F>(&self, key: &Q, updater: F) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let hash = compute_hash(key);
        let current = self.root.lookup(key, hash, 0);

        match (current, updater(current.map(|(_, value)| value))) {
            (Some((stored_key, _)), Some(value)) => {
                let (root, _) = Node::insert(&self.root, stored_key.clone(), hash, value);
                Self {
                    root,
                    length: self.length,
                }
            }
            (Some(_), None) => self.remove(key),
            (None, Some(value)) => {
                let (root, _) = Node::insert(&self.root, key.to_owned(), hash, value);
                Self {
                    root,
                    length: self.length + 1,
                }
            }
            (None, None) => self.clone(),
        }
    }

    /// Replaces the entry `current` with `replacement` when this map holds
    /// exactly `current`; otherwise returns this map unchanged.
    #[must_use]
    pub fn replace(&self, current: &(K, V), (key, value): (K, V)) -> Self
    where
        V: PartialEq,
    {
        if self.contains(current) {
            self.remove(&current.0).insert(key, value)
        } else {
            self.clone()
        }
    }

    /// Merges two maps, keeping this map's value for keys present in both.
    ///
    /// Subtrees present in only one map are reused as they are, and
    /// subtrees the two maps share by reference are returned without being
    /// visited, so merging a map with a version derived from it only
    /// touches the changed paths.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map1 = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// let map2 = PersistentHashMap::new()
    ///     .insert("b".to_string(), 20)
    ///     .insert("c".to_string(), 3);
    ///
    /// let merged = map1.merge(&map2);
    ///
    /// assert_eq!(merged.get("a"), Some(&1));
    /// assert_eq!(merged.get("b"), Some(&2)); // From map1
    /// assert_eq!(merged.get("c"), Some(&3));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        let root = Node::merge(
            &self.root,
            &other.root,
            0,
            &mut |left: &V, _: &V| left.clone(),
            SharedSubtrees::Reuse,
        );
        tracing::trace!(
            left = self.length,
            right = other.length,
            unchanged = ReferenceCounter::ptr_eq(&root, &self.root),
            "merged maps keeping left values"
        );
        Self::from_root(root)
    }

    /// Merges two maps, resolving keys present in both with `resolution`.
    ///
    /// `resolution` receives this map's value first and `other`'s value
    /// second, and is called once for every key the maps have in common.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map1 = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// let map2 = PersistentHashMap::new()
    ///     .insert("b".to_string(), 20)
    ///     .insert("c".to_string(), 3);
    ///
    /// let merged = map1.merge_with(&map2, |left, right| left + right);
    /// assert_eq!(merged.get("b"), Some(&22));
    /// assert_eq!(merged.len(), 3);
    /// ```
    #[must_use]
    pub fn merge_with<F>(&self, other: &Self, mut resolution: F) -> Self
    where
        F: FnMut(&V, &V) -> V,
    {
        let root = Node::merge(
            &self.root,
            &other.root,
            0,
            &mut resolution,
            SharedSubtrees::Descend,
        );
        tracing::trace!(
            left = self.length,
            right = other.length,
            "merged maps with resolution"
        );
        Self::from_root(root)
    }

    /// Returns the set of keys.
    ///
    /// The set reuses this map's trie shape and stored hashes.
    #[must_use]
    pub fn key_set(&self) -> PersistentHashSet<K> {
        let keys = PersistentHashMap {
            root: self.root.map_values(&mut |_, _| ()),
            length: self.length,
        };
        PersistentHashSet::from_map(keys)
    }

    /// Maps every value, keeping keys in place.
    ///
    /// The result has the same trie shape as this map and keys are never
    /// rehashed, so both maps iterate in the same order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new()
    ///     .insert("a".to_string(), 1)
    ///     .insert("b".to_string(), 2);
    /// let scaled = map.map_values(|value| value * 10);
    ///
    /// assert_eq!(scaled.get("b"), Some(&20));
    /// assert!(map.keys().eq(scaled.keys()));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut function: F) -> PersistentHashMap<K, W>
    where
        F: FnMut(&V) -> W,
    {
        PersistentHashMap {
            root: self.root.map_values(&mut |_, value| function(value)),
            length: self.length,
        }
    }

    // =========================================================================
    // Traversal algebra
    // =========================================================================

    /// Builds a new map from transformed entries. When two entries map to
    /// the same key, the later one in canonical order wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert(1, "one").insert(2, "two");
    /// let swapped = map.map(|key, value| (*value, *key));
    /// assert_eq!(swapped.get("two"), Some(&2));
    /// ```
    #[must_use]
    pub fn map<U, W, F>(&self, mapper: F) -> PersistentHashMap<U, W>
    where
        U: Clone + Hash + Eq,
        W: Clone,
        F: FnMut(&K, &V) -> (U, W),
    {
        tracing::trace!(entries = self.length, "rebuilding map from mapped entries");
        traversal::map(self, mapper)
    }

    /// Builds a new map from every entry each entry fans out to.
    #[must_use]
    pub fn flat_map<U, W, I, F>(&self, mapper: F) -> PersistentHashMap<U, W>
    where
        U: Clone + Hash + Eq,
        W: Clone,
        I: IntoIterator<Item = (U, W)>,
        F: FnMut(&K, &V) -> I,
    {
        tracing::trace!(
            entries = self.length,
            "rebuilding map from flat-mapped entries"
        );
        traversal::flat_map(self, mapper)
    }

    /// Maps every entry to one element, in canonical order.
    pub fn traverse<U, F>(&self, mapper: F) -> Vec<U>
    where
        F: FnMut(&K, &V) -> U,
    {
        traversal::traverse(self, mapper)
    }

    /// Folds entries in canonical order.
    pub fn fold_left<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut(B, (&K, &V)) -> B,
    {
        traversal::fold_left(self, init, function)
    }

    /// Folds entries in reverse canonical order.
    pub fn fold_right<B, F>(&self, init: B, function: F) -> B
    where
        F: FnMut((&K, &V), B) -> B,
    {
        traversal::fold_right(self, init, function)
    }

    /// Keeps the entries satisfying `predicate`.
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::filter(self, predicate)
    }

    /// Keeps the entries not satisfying `predicate`.
    #[must_use]
    pub fn filter_not<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::filter_not(self, predicate)
    }

    /// Splits into the entries satisfying `predicate` and the rest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
    /// let (even, odd) = map.partition(|key, _| key % 2 == 0);
    /// assert_eq!(even.len(), 5);
    /// assert_eq!(even.merge(&odd), map);
    /// ```
    #[must_use]
    pub fn partition<P>(&self, predicate: P) -> (Self, Self)
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::partition(self, predicate)
    }

    /// Splits at the first entry not satisfying `predicate`.
    #[must_use]
    pub fn span<P>(&self, predicate: P) -> (Self, Self)
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::span(self, predicate)
    }

    /// Longest prefix satisfying `predicate`.
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::take_while(self, predicate)
    }

    /// Drops the longest prefix satisfying `predicate`.
    #[must_use]
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::drop_while(self, predicate)
    }

    /// Longest prefix before the first entry satisfying `predicate`.
    #[must_use]
    pub fn take_until<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::take_until(self, predicate)
    }

    /// Drops entries up to the first one satisfying `predicate`.
    #[must_use]
    pub fn drop_until<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        traversal::drop_until(self, predicate)
    }

    /// First `count` entries.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        traversal::take(self, count)
    }

    /// Last `count` entries.
    #[must_use]
    pub fn take_right(&self, count: usize) -> Self {
        traversal::take_right(self, count)
    }

    /// Drops the first `count` entries.
    #[must_use]
    pub fn drop(&self, count: usize) -> Self {
        traversal::drop(self, count)
    }

    /// Drops the last `count` entries.
    #[must_use]
    pub fn drop_right(&self, count: usize) -> Self {
        traversal::drop_right(self, count)
    }

    /// First entry in canonical order.
    #[must_use]
    pub fn head_option(&self) -> Option<(K, V)> {
        traversal::head_option(self)
    }

    /// Every entry but the last, or `None` when empty.
    #[must_use]
    pub fn init_option(&self) -> Option<Self> {
        traversal::init_option(self)
    }

    /// Every entry but the first, or `None` when empty.
    #[must_use]
    pub fn tail_option(&self) -> Option<Self> {
        traversal::tail_option(self)
    }

    /// Every entry but the last.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::EmptyMap`] when the map is empty.
    pub fn init(&self) -> Result<Self, MapError> {
        traversal::init(self)
    }

    /// Every entry but the first.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::EmptyMap`] when the map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::MapError;
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::singleton(1, 'a');
    /// assert!(map.tail().unwrap().is_empty());
    /// assert_eq!(
    ///     map.clear().tail(),
    ///     Err(MapError::EmptyMap { operation: "tail" })
    /// );
    /// ```
    pub fn tail(&self) -> Result<Self, MapError> {
        traversal::tail(self)
    }

    /// Returns this map: its entries are already distinct, since every key
    /// appears once.
    #[must_use]
    pub fn distinct(&self) -> Self {
        self.clone()
    }

    /// Keeps the first entry for each distinct result of `key_extractor`.
    #[must_use]
    pub fn distinct_by<U, F>(&self, key_extractor: F) -> Self
    where
        U: Hash + Eq,
        F: FnMut(&K, &V) -> U,
    {
        traversal::distinct_by(self, key_extractor)
    }

    /// Keeps only the entries that also appear in `elements`.
    #[must_use]
    pub fn retain_all<I>(&self, elements: I) -> Self
    where
        V: PartialEq,
        I: IntoIterator<Item = (K, V)>,
    {
        traversal::retain_all(self, elements)
    }

    /// Groups entries by `classifier` into a map of sub-maps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<i32, i32> = (0..9).map(|key| (key, key)).collect();
    /// let groups = map.group_by(|key, _| key % 3);
    /// assert_eq!(groups.len(), 3);
    /// assert_eq!(groups.get(&0).map(PersistentHashMap::len), Some(3));
    /// ```
    #[must_use]
    pub fn group_by<C, F>(&self, classifier: F) -> PersistentHashMap<C, Self>
    where
        C: Clone + Hash + Eq,
        F: FnMut(&K, &V) -> C,
    {
        traversal::group_by::<_, _, Self, _, _>(self, classifier)
    }

    /// Groups entries by a fallible `classifier`.
    ///
    /// # Errors
    ///
    /// Returns the first error `classifier` produces.
    pub fn try_group_by<C, E, F>(&self, classifier: F) -> Result<PersistentHashMap<C, Self>, E>
    where
        C: Clone + Hash + Eq,
        F: FnMut(&K, &V) -> Result<C, E>,
    {
        traversal::try_group_by::<_, _, Self, _, _, _>(self, classifier)
    }

    /// Non-overlapping chunks of `size` entries.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPartitionParameter`] when `size` is zero.
    pub fn grouped(&self, size: usize) -> Result<Vec<Self>, MapError> {
        traversal::grouped(self, size)
    }

    /// Sliding windows of `size` entries with step one.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPartitionParameter`] when `size` is zero.
    pub fn sliding(&self, size: usize) -> Result<Vec<Self>, MapError> {
        traversal::sliding(self, size)
    }

    /// Sliding windows of `size` entries, `step` entries apart.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidPartitionParameter`] when `size` or
    /// `step` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<i32, char> = (1..=5).zip('a'..).collect();
    /// let windows = map.sliding_by(3, 1).unwrap();
    /// assert_eq!(windows.len(), 3);
    /// assert!(map.sliding_by(3, 0).is_err());
    /// ```
    pub fn sliding_by(&self, size: usize, step: usize) -> Result<Vec<Self>, MapError> {
        traversal::sliding_by(self, size, step)
    }

    /// Running entry states of a left scan, rebuilt into a map.
    #[must_use]
    pub fn scan<F>(&self, zero: (K, V), operation: F) -> Self
    where
        F: FnMut(&(K, V), (&K, &V)) -> (K, V),
    {
        traversal::scan(self, zero, operation)
    }

    /// Running states of a left scan, `zero` first.
    pub fn scan_left<U, F>(&self, zero: U, operation: F) -> Vec<U>
    where
        F: FnMut(&U, (&K, &V)) -> U,
    {
        traversal::scan_left(self, zero, operation)
    }

    /// Running states of a right scan, `zero` last.
    pub fn scan_right<U, F>(&self, zero: U, operation: F) -> Vec<U>
    where
        F: FnMut((&K, &V), &U) -> U,
    {
        traversal::scan_right(self, zero, operation)
    }

    /// Splits every entry into two parts.
    pub fn unzip<A, B, F>(&self, splitter: F) -> (Vec<A>, Vec<B>)
    where
        F: FnMut(&K, &V) -> (A, B),
    {
        traversal::unzip(self, splitter)
    }

    /// Splits every entry into three parts.
    pub fn unzip3<A, B, C, F>(&self, splitter: F) -> (Vec<A>, Vec<B>, Vec<C>)
    where
        F: FnMut(&K, &V) -> (A, B, C),
    {
        traversal::unzip3(self, splitter)
    }

    /// Pairs entries with the elements of `that`.
    pub fn zip<I>(&self, that: I) -> Vec<((K, V), I::Item)>
    where
        I: IntoIterator,
    {
        traversal::zip(self, that)
    }

    /// Pairs entries with the elements of `that`, padding the shorter side.
    pub fn zip_all<I>(
        &self,
        that: I,
        this_element: (K, V),
        that_element: I::Item,
    ) -> Vec<((K, V), I::Item)>
    where
        I: IntoIterator,
        I::Item: Clone,
    {
        traversal::zip_all(self, that, this_element, that_element)
    }

    /// Pairs every entry with its canonical position.
    #[must_use]
    pub fn zip_with_index(&self) -> Vec<((K, V), usize)> {
        traversal::zip_with_index(self)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`PersistentHashMap`].
pub struct PersistentHashMapIterator<'a, K, V> {
    inner: NodeIter<'a, K, V>,
}

impl<'a, K, V> Iterator for PersistentHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIterator<'_, K, V> {}

impl<K, V> FusedIterator for PersistentHashMapIterator<'_, K, V> {}

impl<K, V> Clone for PersistentHashMapIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// An owning iterator over key-value pairs of a [`PersistentHashMap`].
pub struct PersistentHashMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for PersistentHashMapIntoIterator<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIntoIterator<K, V> {}

impl<K, V> FusedIterator for PersistentHashMapIntoIterator<K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for PersistentHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentHashMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentHashMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        PersistentHashMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentHashMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> EntrySequence for PersistentHashMap<K, V> {
    type Key = K;
    type Value = V;
    type Entries<'a>
        = PersistentHashMapIterator<'a, K, V>
    where
        Self: 'a;

    fn entries(&self) -> Self::Entries<'_> {
        self.iter()
    }

    fn entry_count(&self) -> usize {
        self.length
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for PersistentHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.length != other.length {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for PersistentHashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for PersistentHashMap<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentHashMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> PersistentHashMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for PersistentHashMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentHashMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        // Duplicate keys follow insert: the last one wins.
        let mut map = PersistentHashMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for PersistentHashMap<K, V>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentHashMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_empty() {
        let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{}");
    }

    #[rstest]
    fn test_serialize_single_entry() {
        let map = PersistentHashMap::singleton("key".to_string(), 42);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"key":42}"#);
    }

    #[rstest]
    fn test_roundtrip_preserves_entries() {
        let map: PersistentHashMap<String, i32> =
            (0..20).map(|key| (format!("key{key}"), key)).collect();
        let json = serde_json::to_string(&map).unwrap();
        let restored: PersistentHashMap<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, map);
    }

    #[rstest]
    fn test_deserialize_duplicate_keys_last_wins() {
        let json = r#"{"a":1,"a":2}"#;
        let map: PersistentHashMap<String, i32> = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&2));
    }
}
