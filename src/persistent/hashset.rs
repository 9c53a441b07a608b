//! Persistent (immutable) hash set.
//!
//! [`PersistentHashSet`] wraps a `PersistentHashMap<T, ()>`, so it shares
//! the map's trie, hasher and canonical iteration order. It is what
//! [`PersistentHashMap::key_set`] returns.
//!
//! - O(log32 N) contains, insert and remove
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use persistent_map::persistent::PersistentHashSet;
//!
//! let set_a: PersistentHashSet<i32> = [1, 2, 3].into_iter().collect();
//! let set_b: PersistentHashSet<i32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(set_a.union(&set_b).len(), 4);
//! assert_eq!(set_a.intersection(&set_b).len(), 2);
//! assert_eq!(set_a.difference(&set_b).len(), 1);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use super::hashmap::{PersistentHashMap, PersistentHashMapIntoIterator, PersistentHashMapIterator};

// =============================================================================
// PersistentHashSet Definition
// =============================================================================

/// A persistent (immutable) hash set.
///
/// # Examples
///
/// ```rust
/// use persistent_map::persistent::PersistentHashSet;
///
/// let set = PersistentHashSet::new().insert(1).insert(2);
/// let updated = set.insert(3);
///
/// assert_eq!(set.len(), 2);     // Original unchanged
/// assert_eq!(updated.len(), 3); // New version
/// ```
pub struct PersistentHashSet<T> {
    inner: PersistentHashMap<T, ()>,
}

impl<T> Clone for PersistentHashSet<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> PersistentHashSet<T> {
    /// Creates a new empty set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: PersistentHashMap::new(),
        }
    }

    pub(crate) fn from_map(inner: PersistentHashMap<T, ()>) -> Self {
        Self { inner }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over elements in canonical order.
    #[must_use]
    pub fn iter(&self) -> PersistentHashSetIterator<'_, T> {
        PersistentHashSetIterator {
            inner: self.inner.iter(),
        }
    }
}

impl<T: Hash + Eq> PersistentHashSet<T> {
    /// Returns `true` if the set contains `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_map::persistent::PersistentHashSet;
    ///
    /// let set = PersistentHashSet::singleton("apple".to_string());
    /// assert!(set.contains("apple"));
    /// assert!(!set.contains("pear"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(element)
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }
}

impl<T: Clone + Hash + Eq> PersistentHashSet<T> {
    /// Creates a set containing one element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }

    /// Returns a set that also contains `element`.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            inner: self.inner.insert(element, ()),
        }
    }

    /// Returns a set without `element`.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Self {
            inner: self.inner.remove(element),
        }
    }

    /// Elements in either set. Shares structure with both inputs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.merge(&other.inner),
        }
    }

    /// Elements in both sets.
    ///
    /// # Complexity
    ///
    /// O(min(n, m) * log32(max(n, m)))
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Self {
            inner: smaller.inner.filter(|element, ()| larger.contains(element)),
        }
    }

    /// Elements of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.filter_not(|element, ()| other.contains(element)),
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the elements of a [`PersistentHashSet`].
pub struct PersistentHashSetIterator<'a, T> {
    inner: PersistentHashMapIterator<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentHashSetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentHashSetIterator<'_, T> {}

impl<T> FusedIterator for PersistentHashSetIterator<'_, T> {}

/// An owning iterator over the elements of a [`PersistentHashSet`].
pub struct PersistentHashSetIntoIterator<T> {
    inner: PersistentHashMapIntoIterator<T, ()>,
}

impl<T> Iterator for PersistentHashSetIntoIterator<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for PersistentHashSetIntoIterator<T> {}

impl<T> FusedIterator for PersistentHashSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentHashSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Hash + Eq> FromIterator<T> for PersistentHashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|element| (element, ())).collect(),
        }
    }
}

impl<T: Clone> IntoIterator for PersistentHashSet<T> {
    type Item = T;
    type IntoIter = PersistentHashSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentHashSetIntoIterator {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentHashSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentHashSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Hash + Eq> PartialEq for PersistentHashSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Hash + Eq> Eq for PersistentHashSet<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentHashSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentHashSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentHashSet<T>
where
    T: serde::Deserialize<'de> + Clone + Hash + Eq,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements: Vec<T> = serde::Deserialize::deserialize(deserializer)?;
        Ok(elements.into_iter().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
