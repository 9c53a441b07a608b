//! # persistent-map
//!
//! An immutable, persistent hash map for Rust with structural sharing and a
//! traversal/transformation algebra.
//!
//! ## Overview
//!
//! - **Persistent Hash Map**: a hash array mapped trie (HAMT) where every
//!   update returns a new map and shares all untouched subtrees with the
//!   old one
//! - **Key Set**: a persistent hash set backed by the same trie
//! - **Traversal Algebra**: map, filter, partition, grouping, windowing,
//!   scans and zips written once over canonical entry order
//!
//! ## Feature Flags
//!
//! - `persistent`: Persistent hash map and set (default)
//! - `arc`: Use `Arc` instead of `Rc` so maps are `Send + Sync`
//! - `serde`: Serialize and deserialize maps and sets
//! - `fxhash`: Hash keys with `rustc-hash`
//! - `ahash`: Hash keys with `ahash`
//! - `full`: Enable `persistent` and `serde`
//!
//! ## Example
//!
//! ```rust
//! use persistent_map::prelude::*;
//!
//! let map = PersistentHashMap::new()
//!     .insert("a".to_string(), 1)
//!     .insert("b".to_string(), 2);
//! let evens = map.filter(|_, value| value % 2 == 0);
//!
//! assert_eq!(evens.len(), 1);
//! assert_eq!(map.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use persistent_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::MapError;

    pub use crate::traversal::EntrySequence;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

pub mod error;

pub mod traversal;

#[cfg(feature = "persistent")]
pub mod persistent;

pub use error::MapError;
