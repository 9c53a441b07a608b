//! Traversal and transformation algebra over canonical entry order.
//!
//! Every operation in this module is written once, against two
//! capabilities:
//!
//! - [`EntrySequence`]: the container can enumerate its entries in a
//!   deterministic canonical order;
//! - [`FromIterator<(K, V)>`]: the container can be rebuilt from entries.
//!   For maps, rebuilding folds insertion, so later entries win when two of
//!   them share a key.
//!
//! Any container providing both gets the whole algebra. The crate
//! implements [`EntrySequence`] for
//! [`PersistentHashMap`](crate::persistent::PersistentHashMap) and for
//! [`BTreeMap`], whose canonical order is key order.
//!
//! All operations are single pass and O(n) in the entries they touch.
//! Sequence-shaped results are returned as `Vec`.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use persistent_map::traversal;
//!
//! let map: BTreeMap<i32, &str> = [(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]
//!     .into_iter()
//!     .collect();
//!
//! let windows: Vec<BTreeMap<i32, &str>> = traversal::sliding_by(&map, 3, 1).unwrap();
//! assert_eq!(windows.len(), 3);
//!
//! let (even, odd): (BTreeMap<i32, &str>, BTreeMap<i32, &str>) =
//!     traversal::partition(&map, |key, _| key % 2 == 0);
//! assert_eq!(even.len() + odd.len(), map.len());
//! ```

use std::collections::BTreeMap;

mod selection;
mod transform;
mod windowing;
mod zipping;

pub use selection::{
    distinct_by, drop, drop_right, drop_until, drop_while, filter, filter_not, head_option, init,
    init_option, partition, retain_all, span, tail, tail_option, take, take_right, take_until,
    take_while,
};
pub use transform::{flat_map, fold_left, fold_right, map, map_values, traverse};
pub use windowing::{group_by, grouped, sliding, sliding_by, try_group_by};
pub use zipping::{scan, scan_left, scan_right, unzip, unzip3, zip, zip_all, zip_with_index};

/// A container that enumerates its entries in a canonical order.
///
/// The order must be deterministic for a given structure; it does not have
/// to match insertion order. Calling [`entries`](Self::entries) again
/// restarts the enumeration.
pub trait EntrySequence {
    /// The key type.
    type Key;
    /// The value type.
    type Value;
    /// Iterator over borrowed entries in canonical order.
    type Entries<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
    where
        Self: 'a;

    /// Enumerates all entries in canonical order.
    fn entries(&self) -> Self::Entries<'_>;

    /// Number of entries.
    fn entry_count(&self) -> usize {
        self.entries().count()
    }
}

impl<K, V> EntrySequence for BTreeMap<K, V> {
    type Key = K;
    type Value = V;
    type Entries<'a>
        = std::collections::btree_map::Iter<'a, K, V>
    where
        Self: 'a;

    fn entries(&self) -> Self::Entries<'_> {
        self.iter()
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

/// Clones a borrowed entry into an owned pair.
#[inline]
pub(crate) fn cloned_entry<K: Clone, V: Clone>((key, value): (&K, &V)) -> (K, V) {
    (key.clone(), value.clone())
}
