//! Persistent (immutable) hash map and key set.
//!
//! - [`PersistentHashMap`]: persistent hash map (HAMT)
//! - [`PersistentHashSet`]: persistent hash set, returned by
//!   [`PersistentHashMap::key_set`]
//!
//! # Structural Sharing
//!
//! Every operation that looks like a mutation returns a new value. Only the
//! nodes on the path to the change are rebuilt; all other subtrees are shared
//! by reference between the old and the new version.
//!
//! # Examples
//!
//! ```rust
//! use persistent_map::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .insert("a".to_string(), 1)
//!     .insert("b".to_string(), 2)
//!     .insert("c".to_string(), 3);
//! assert_eq!(map.len(), 3);
//!
//! let other = PersistentHashMap::new()
//!     .insert("b".to_string(), 20)
//!     .insert("d".to_string(), 4);
//! let merged = map.merge_with(&other, |left, right| left + right);
//! assert_eq!(merged.get("b"), Some(&22));
//!
//! let scaled = merged.map_values(|value| value * 10);
//! assert_eq!(scaled.get("b"), Some(&220));
//! assert_eq!(map.get("b"), Some(&2)); // Original unchanged
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod hashmap;
mod hashset;
mod node;

pub use hashmap::PersistentHashMap;
pub use hashmap::PersistentHashMapIntoIterator;
pub use hashmap::PersistentHashMapIterator;
pub use hashset::PersistentHashSet;
pub use hashset::PersistentHashSetIntoIterator;
pub use hashset::PersistentHashSetIterator;

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentHashMap<String, i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentHashSet<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentHashMap<String, i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
