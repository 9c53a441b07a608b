//! Hash array mapped trie nodes.
//!
//! Nodes are immutable once built. Every structural operation returns a new
//! [`NodeRef`] for the rebuilt path and aliases every untouched subtree, so
//! any number of map versions can share interior nodes.
//!
//! # Layout
//!
//! - [`Node::Empty`] only appears as the root of an empty map.
//! - [`Node::Leaf`] holds one entry, or a collision run of entries whose full
//!   hashes are equal, in insertion order.
//! - [`Node::Branch`] is a 32-way bitmap-compressed branch. Its children are
//!   never `Empty`, and it caches the number of entries below it.
//!
//! A branch whose only child is a leaf is collapsed into that leaf. A branch
//! whose only child is another branch is kept, since the slot a branch
//! occupies is determined by its depth.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use smallvec::{SmallVec, smallvec};

use super::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
const BRANCHING_FACTOR: usize = 32;

/// Bits per level in the trie
const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting index within a node
const MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

/// Maximum depth of the trie (64 bits / 5 bits per level, rounded up)
pub(crate) const MAX_DEPTH: usize = u64::BITS.div_ceil(BITS_PER_LEVEL as u32) as usize;

// =============================================================================
// Hash computation
// =============================================================================

#[cfg(feature = "fxhash")]
type KeyHasher = rustc_hash::FxHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type KeyHasher = ahash::AHasher;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type KeyHasher = std::collections::hash_map::DefaultHasher;

/// Computes the hash of a key with the configured hasher.
///
/// The hasher is deterministic for a given build, which keeps canonical
/// iteration order stable between runs.
pub(crate) fn compute_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = KeyHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Extracts the slot index at a given depth from a hash.
#[inline]
fn hash_index(hash: u64, depth: usize) -> u32 {
    let shift = u32::try_from(depth * BITS_PER_LEVEL).unwrap_or(u32::MAX);
    (hash.checked_shr(shift).unwrap_or(0) & MASK) as u32
}

/// Position of the slot marked by `bit` inside the compressed children.
#[inline]
const fn slot_position(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// =============================================================================
// Node Definition
// =============================================================================

/// Shared handle to a trie node.
pub(crate) type NodeRef<K, V> = ReferenceCounter<Node<K, V>>;

/// Entries stored in a leaf. Almost every leaf holds exactly one.
pub(crate) type LeafEntries<K, V> = SmallVec<[(K, V); 1]>;

/// Internal node structure for the HAMT.
pub(crate) enum Node<K, V> {
    /// Holds nothing.
    Empty,
    /// One entry, or a run of entries sharing the same full hash.
    Leaf {
        hash: u64,
        entries: LeafEntries<K, V>,
    },
    /// Bitmap-indexed branch node.
    Branch {
        /// Occupied slots for the hash fragment at this depth
        bitmap: u32,
        /// Number of entries reachable from this branch
        size: usize,
        /// Present children in slot order, never `Empty`
        children: Box<[NodeRef<K, V>]>,
    },
}

/// How [`Node::merge`] treats subtrees that both sides share by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SharedSubtrees {
    /// Return a shared subtree unchanged without looking inside it. Only
    /// sound when the resolution keeps the left value.
    Reuse,
    /// Descend into shared subtrees and resolve every key.
    Descend,
}

impl<K, V> Node<K, V> {
    /// Creates a shared empty node.
    pub(crate) fn empty() -> NodeRef<K, V> {
        ReferenceCounter::new(Self::Empty)
    }

    fn leaf(hash: u64, key: K, value: V) -> NodeRef<K, V> {
        ReferenceCounter::new(Self::Leaf {
            hash,
            entries: smallvec![(key, value)],
        })
    }

    /// Number of entries reachable from this node.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf { entries, .. } => entries.len(),
            Self::Branch { size, .. } => *size,
        }
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Finds the stored entry for `key`.
    pub(crate) fn lookup<Q>(&self, key: &Q, hash: u64, depth: usize) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Empty => None,
            Self::Leaf {
                hash: leaf_hash,
                entries,
            } => {
                if *leaf_hash != hash {
                    return None;
                }
                entries
                    .iter()
                    .find(|(entry_key, _)| entry_key.borrow() == key)
                    .map(|(entry_key, value)| (entry_key, value))
            }
            Self::Branch {
                bitmap, children, ..
            } => {
                let bit = 1u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    None
                } else {
                    children[slot_position(*bitmap, bit)].lookup(key, hash, depth + 1)
                }
            }
        }
    }

    /// Iterates over entries in canonical order.
    pub(crate) fn iter(&self) -> NodeIter<'_, K, V> {
        NodeIter::new(self)
    }

    /// Builds the smallest branch separating two nodes with different hashes.
    ///
    /// Both nodes are reused by reference.
    fn branch_from_pair(
        existing: NodeRef<K, V>,
        existing_hash: u64,
        incoming: NodeRef<K, V>,
        incoming_hash: u64,
        depth: usize,
    ) -> NodeRef<K, V> {
        debug_assert_ne!(existing_hash, incoming_hash);
        let existing_index = hash_index(existing_hash, depth);
        let incoming_index = hash_index(incoming_hash, depth);
        let size = existing.len() + incoming.len();

        if existing_index == incoming_index {
            let child =
                Self::branch_from_pair(existing, existing_hash, incoming, incoming_hash, depth + 1);
            ReferenceCounter::new(Self::Branch {
                bitmap: 1u32 << existing_index,
                size,
                children: Box::new([child]),
            })
        } else {
            let children: Box<[NodeRef<K, V>]> = if existing_index < incoming_index {
                Box::new([existing, incoming])
            } else {
                Box::new([incoming, existing])
            };
            ReferenceCounter::new(Self::Branch {
                bitmap: (1u32 << existing_index) | (1u32 << incoming_index),
                size,
                children,
            })
        }
    }
}

impl<K: Clone + Eq, V: Clone> Node<K, V> {
    /// Inserts or replaces the value for `key`.
    ///
    /// `resolve` receives the current value (if any) and returns the value
    /// to store. Returns the new node and whether an entry was added.
    pub(crate) fn upsert<F>(
        node: &NodeRef<K, V>,
        key: K,
        hash: u64,
        depth: usize,
        resolve: F,
    ) -> (NodeRef<K, V>, bool)
    where
        F: FnOnce(Option<&V>) -> V,
    {
        match &**node {
            Self::Empty => (Self::leaf(hash, key, resolve(None)), true),
            Self::Leaf {
                hash: leaf_hash,
                entries,
            } if *leaf_hash == hash => {
                let mut new_entries = entries.clone();
                let added = match new_entries
                    .iter()
                    .position(|(entry_key, _)| *entry_key == key)
                {
                    Some(position) => {
                        let value = resolve(Some(&entries[position].1));
                        new_entries[position] = (key, value);
                        false
                    }
                    None => {
                        new_entries.push((key, resolve(None)));
                        true
                    }
                };
                (
                    ReferenceCounter::new(Self::Leaf {
                        hash,
                        entries: new_entries,
                    }),
                    added,
                )
            }
            Self::Leaf {
                hash: leaf_hash, ..
            } => {
                let incoming = Self::leaf(hash, key, resolve(None));
                (
                    Self::branch_from_pair(node.clone(), *leaf_hash, incoming, hash, depth),
                    true,
                )
            }
            Self::Branch {
                bitmap,
                size,
                children,
            } => {
                let bit = 1u32 << hash_index(hash, depth);
                let position = slot_position(*bitmap, bit);

                if bitmap & bit == 0 {
                    let mut new_children = Vec::with_capacity(children.len() + 1);
                    new_children.extend_from_slice(&children[..position]);
                    new_children.push(Self::leaf(hash, key, resolve(None)));
                    new_children.extend_from_slice(&children[position..]);
                    (
                        ReferenceCounter::new(Self::Branch {
                            bitmap: bitmap | bit,
                            size: size + 1,
                            children: new_children.into_boxed_slice(),
                        }),
                        true,
                    )
                } else {
                    let (new_child, added) =
                        Self::upsert(&children[position], key, hash, depth + 1, resolve);
                    let mut new_children = children.clone();
                    new_children[position] = new_child;
                    (
                        ReferenceCounter::new(Self::Branch {
                            bitmap: *bitmap,
                            size: size + usize::from(added),
                            children: new_children,
                        }),
                        added,
                    )
                }
            }
        }
    }

    /// Inserts `value` for `key`, replacing any existing value.
    pub(crate) fn insert(
        node: &NodeRef<K, V>,
        key: K,
        hash: u64,
        value: V,
    ) -> (NodeRef<K, V>, bool) {
        Self::upsert(node, key, hash, 0, |_| value)
    }

    /// Removes `key`. Returns `None` when the key is absent, in which case
    /// the caller keeps the original node.
    pub(crate) fn remove<Q>(
        node: &NodeRef<K, V>,
        key: &Q,
        hash: u64,
        depth: usize,
    ) -> Option<NodeRef<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match &**node {
            Self::Empty => None,
            Self::Leaf {
                hash: leaf_hash,
                entries,
            } => {
                if *leaf_hash != hash {
                    return None;
                }
                let position = entries
                    .iter()
                    .position(|(entry_key, _)| entry_key.borrow() == key)?;
                if entries.len() == 1 {
                    return Some(Self::empty());
                }
                let mut new_entries = entries.clone();
                new_entries.remove(position);
                Some(ReferenceCounter::new(Self::Leaf {
                    hash,
                    entries: new_entries,
                }))
            }
            Self::Branch {
                bitmap,
                size,
                children,
            } => {
                let bit = 1u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    return None;
                }
                let position = slot_position(*bitmap, bit);
                let new_child = Self::remove(&children[position], key, hash, depth + 1)?;

                if new_child.is_empty() {
                    Some(Self::without_slot(
                        *bitmap & !bit,
                        size - 1,
                        children,
                        position,
                    ))
                } else if children.len() == 1 && new_child.is_leaf() {
                    Some(new_child)
                } else {
                    let mut new_children = children.clone();
                    new_children[position] = new_child;
                    Some(ReferenceCounter::new(Self::Branch {
                        bitmap: *bitmap,
                        size: size - 1,
                        children: new_children,
                    }))
                }
            }
        }
    }

    /// Drops the child at `position`, collapsing the branch when it would be
    /// left empty or holding a single leaf.
    fn without_slot(
        bitmap: u32,
        size: usize,
        children: &[NodeRef<K, V>],
        position: usize,
    ) -> NodeRef<K, V> {
        match children.len() {
            1 => Self::empty(),
            2 => {
                let survivor = &children[1 - position];
                if survivor.is_leaf() {
                    survivor.clone()
                } else {
                    ReferenceCounter::new(Self::Branch {
                        bitmap,
                        size,
                        children: Box::new([survivor.clone()]),
                    })
                }
            }
            _ => {
                let mut new_children = Vec::with_capacity(children.len() - 1);
                new_children.extend_from_slice(&children[..position]);
                new_children.extend_from_slice(&children[position + 1..]);
                ReferenceCounter::new(Self::Branch {
                    bitmap,
                    size,
                    children: new_children.into_boxed_slice(),
                })
            }
        }
    }

    /// Structural union of two tries rooted at the same depth.
    ///
    /// Subtrees present on one side only are reused as they are. A key
    /// present on both sides gets `resolve(left_value, right_value)`.
    pub(crate) fn merge<F>(
        left: &NodeRef<K, V>,
        right: &NodeRef<K, V>,
        depth: usize,
        resolve: &mut F,
        shared: SharedSubtrees,
    ) -> NodeRef<K, V>
    where
        F: FnMut(&V, &V) -> V,
    {
        if shared == SharedSubtrees::Reuse && ReferenceCounter::ptr_eq(left, right) {
            return left.clone();
        }

        match (&**left, &**right) {
            (Self::Empty, _) => right.clone(),
            (_, Self::Empty) => left.clone(),
            (
                Self::Branch {
                    bitmap: left_bitmap,
                    children: left_children,
                    ..
                },
                Self::Branch {
                    bitmap: right_bitmap,
                    children: right_children,
                    ..
                },
            ) => Self::merge_branches(
                (*left_bitmap, &left_children[..]),
                (*right_bitmap, &right_children[..]),
                left,
                depth,
                resolve,
                shared,
            ),
            (Self::Leaf { hash, entries }, _) => {
                let mut result = right.clone();
                for (key, left_value) in entries {
                    let (merged, _) =
                        Self::upsert(&result, key.clone(), *hash, depth, |existing| {
                            existing.map_or_else(
                                || left_value.clone(),
                                |right_value| resolve(left_value, right_value),
                            )
                        });
                    result = merged;
                }
                result
            }
            (_, Self::Leaf { hash, entries }) => {
                let mut result = left.clone();
                for (key, right_value) in entries {
                    if shared == SharedSubtrees::Reuse && result.lookup(key, *hash, depth).is_some()
                    {
                        continue;
                    }
                    let (merged, _) =
                        Self::upsert(&result, key.clone(), *hash, depth, |existing| {
                            existing.map_or_else(
                                || right_value.clone(),
                                |left_value| resolve(left_value, right_value),
                            )
                        });
                    result = merged;
                }
                result
            }
        }
    }

    fn merge_branches<F>(
        (left_bitmap, left_children): (u32, &[NodeRef<K, V>]),
        (right_bitmap, right_children): (u32, &[NodeRef<K, V>]),
        left: &NodeRef<K, V>,
        depth: usize,
        resolve: &mut F,
        shared: SharedSubtrees,
    ) -> NodeRef<K, V>
    where
        F: FnMut(&V, &V) -> V,
    {
        let bitmap = left_bitmap | right_bitmap;
        let mut children = Vec::with_capacity(bitmap.count_ones() as usize);
        let mut size = 0;
        let mut unchanged = bitmap == left_bitmap;

        for index in 0..BRANCHING_FACTOR {
            let bit = 1u32 << index;
            if bitmap & bit == 0 {
                continue;
            }
            let left_child =
                (left_bitmap & bit != 0).then(|| &left_children[slot_position(left_bitmap, bit)]);
            let right_child = (right_bitmap & bit != 0)
                .then(|| &right_children[slot_position(right_bitmap, bit)]);

            let child = match (left_child, right_child) {
                (Some(left_child), Some(right_child)) => {
                    let merged = Self::merge(left_child, right_child, depth + 1, resolve, shared);
                    unchanged &= ReferenceCounter::ptr_eq(&merged, left_child);
                    merged
                }
                (Some(only), None) | (None, Some(only)) => only.clone(),
                (None, None) => continue,
            };
            size += child.len();
            children.push(child);
        }

        if unchanged {
            return left.clone();
        }
        ReferenceCounter::new(Self::Branch {
            bitmap,
            size,
            children: children.into_boxed_slice(),
        })
    }
}

impl<K: Clone, V> Node<K, V> {
    /// Rebuilds the trie with the same shape and stored hashes, mapping
    /// every value. Keys are cloned, never rehashed.
    pub(crate) fn map_values<W, F>(&self, function: &mut F) -> NodeRef<K, W>
    where
        F: FnMut(&K, &V) -> W,
    {
        let node = match self {
            Self::Empty => Node::Empty,
            Self::Leaf { hash, entries } => Node::Leaf {
                hash: *hash,
                entries: entries
                    .iter()
                    .map(|(key, value)| (key.clone(), function(key, value)))
                    .collect(),
            },
            Self::Branch {
                bitmap,
                size,
                children,
            } => Node::Branch {
                bitmap: *bitmap,
                size: *size,
                children: children
                    .iter()
                    .map(|child| child.map_values(function))
                    .collect(),
            },
        };
        ReferenceCounter::new(node)
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// Lazy canonical-order traversal: slot order within branches, run order
/// within leaves.
pub(crate) struct NodeIter<'a, K, V> {
    stack: Vec<std::slice::Iter<'a, NodeRef<K, V>>>,
    run: std::slice::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> NodeIter<'a, K, V> {
    fn new(root: &'a Node<K, V>) -> Self {
        let mut iterator = Self {
            stack: Vec::with_capacity(MAX_DEPTH),
            run: <&[(K, V)]>::default().iter(),
            remaining: root.len(),
        };
        iterator.descend(root);
        iterator
    }

    fn descend(&mut self, node: &'a Node<K, V>) {
        match node {
            Node::Empty => {}
            Node::Leaf { entries, .. } => self.run = entries.iter(),
            Node::Branch { children, .. } => self.stack.push(children.iter()),
        }
    }
}

impl<'a, K, V> Iterator for NodeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, value)) = self.run.next() {
                self.remaining -= 1;
                return Some((key, value));
            }
            let children = self.stack.last_mut()?;
            match children.next() {
                Some(child) => self.descend(child),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> Clone for NodeIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            run: self.run.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Checks every structural invariant and returns the entry count.
    fn check_invariants<K, V>(node: &Node<K, V>, depth: usize, is_root: bool) -> usize {
        assert!(depth <= MAX_DEPTH, "depth {depth} exceeds {MAX_DEPTH}");
        match node {
            Node::Empty => {
                assert!(is_root, "empty node below the root");
                0
            }
            Node::Leaf { entries, .. } => {
                assert!(!entries.is_empty());
                entries.len()
            }
            Node::Branch {
                bitmap,
                size,
                children,
            } => {
                assert_eq!(bitmap.count_ones() as usize, children.len());
                assert!(!children.is_empty());
                assert!(
                    !(children.len() == 1 && children[0].is_leaf()),
                    "branch holding a single leaf"
                );
                let counted: usize = children
                    .iter()
                    .map(|child| check_invariants(child, depth + 1, false))
                    .sum();
                assert_eq!(counted, *size);
                counted
            }
        }
    }

    fn build(keys: impl IntoIterator<Item = u64>) -> NodeRef<u64, u64> {
        keys.into_iter().fold(Node::empty(), |root, key| {
            Node::insert(&root, key, compute_hash(&key), key * 10).0
        })
    }

    fn children_of<K, V>(node: &Node<K, V>) -> &[NodeRef<K, V>] {
        match node {
            Node::Branch { children, .. } => children,
            _ => panic!("expected a branch"),
        }
    }

    #[rstest]
    fn test_max_depth_covers_hash_width() {
        assert_eq!(MAX_DEPTH, 13);
    }

    #[rstest]
    fn test_hash_index_uses_five_bit_fragments() {
        let hash = 0b10101_00011_u64;
        assert_eq!(hash_index(hash, 0), 0b00011);
        assert_eq!(hash_index(hash, 1), 0b10101);
        assert_eq!(hash_index(hash, 12), 0);
        assert_eq!(hash_index(u64::MAX, 12), 0b1111);
    }

    #[rstest]
    fn test_insert_keeps_invariants() {
        let root = build(0..2_000);
        assert_eq!(check_invariants(&root, 0, true), 2_000);
        for key in 0..2_000u64 {
            assert_eq!(
                root.lookup(&key, compute_hash(&key), 0)
                    .map(|(_, value)| *value),
                Some(key * 10)
            );
        }
    }

    #[rstest]
    fn test_insert_reuses_untouched_children() {
        let root = build(0..1_000);
        let key = 5_000u64;
        let (updated, added) = Node::insert(&root, key, compute_hash(&key), 0);
        assert!(added);

        let before = children_of(&root);
        let after = children_of(&updated);
        let shared = before
            .iter()
            .filter(|old| after.iter().any(|new| ReferenceCounter::ptr_eq(old, new)))
            .count();
        assert!(shared >= before.len() - 1);
        assert_eq!(check_invariants(&root, 0, true), 1_000);
    }

    #[rstest]
    fn test_remove_everything_collapses_to_empty() {
        let mut root = build(0..500);
        for key in 0..500u64 {
            root = Node::remove(&root, &key, compute_hash(&key), 0).unwrap();
            check_invariants(&root, 0, true);
        }
        assert!(root.is_empty());
    }

    #[rstest]
    fn test_remove_absent_key_returns_none() {
        let root = build(0..10);
        assert!(Node::remove(&root, &99u64, compute_hash(&99u64), 0).is_none());
    }

    #[rstest]
    fn test_remove_collapses_single_leaf_branches() {
        let root = build([1, 2]);
        let root = Node::remove(&root, &1u64, compute_hash(&1u64), 0).unwrap();
        assert!(root.is_leaf());
    }

    #[rstest]
    fn test_equal_hashes_form_collision_run() {
        let root: NodeRef<&str, i32> = Node::empty();
        let (root, _) = Node::insert(&root, "a", 7, 1);
        let (root, _) = Node::insert(&root, "b", 7, 2);
        let (root, added) = Node::insert(&root, "a", 7, 3);
        assert!(!added);
        match &*root {
            Node::Leaf { entries, .. } => {
                assert_eq!(entries.as_slice(), &[("a", 3), ("b", 2)]);
            }
            _ => panic!("expected a collision run"),
        }
        let root = Node::remove(&root, "a", 7, 0).unwrap();
        assert_eq!(root.len(), 1);
    }

    #[rstest]
    fn test_merge_reuses_pointer_identical_subtrees() {
        let base = build(0..1_000);
        let key = 1_000_000u64;
        let (derived, _) = Node::insert(&base, key, compute_hash(&key), 1);

        let merged = Node::merge(
            &base,
            &derived,
            0,
            &mut |left: &u64, _: &u64| *left,
            SharedSubtrees::Reuse,
        );
        assert_eq!(check_invariants(&merged, 0, true), 1_001);

        let shared = children_of(&merged)
            .iter()
            .filter(|child| {
                children_of(&base)
                    .iter()
                    .any(|old| ReferenceCounter::ptr_eq(child, old))
            })
            .count();
        assert!(shared >= children_of(&base).len() - 1);
    }

    #[rstest]
    fn test_merge_with_itself_returns_same_root() {
        let base = build(0..100);
        let merged = Node::merge(
            &base,
            &base,
            0,
            &mut |left: &u64, _: &u64| *left,
            SharedSubtrees::Reuse,
        );
        assert!(ReferenceCounter::ptr_eq(&base, &merged));
    }

    #[rstest]
    fn test_merge_descend_resolves_shared_keys() {
        let base = build(0..100);
        let merged = Node::merge(
            &base,
            &base,
            0,
            &mut |left: &u64, right: &u64| left + right,
            SharedSubtrees::Descend,
        );
        assert_eq!(check_invariants(&merged, 0, true), 100);
        assert_eq!(
            merged
                .lookup(&3u64, compute_hash(&3u64), 0)
                .map(|(_, value)| *value),
            Some(60)
        );
    }

    #[rstest]
    fn test_map_values_preserves_shape() {
        let root = build(0..300);
        let mapped = root.map_values(&mut |_, value: &u64| value + 1);
        let original: Vec<u64> = root.iter().map(|(key, _)| *key).collect();
        let remapped: Vec<u64> = mapped.iter().map(|(key, _)| *key).collect();
        assert_eq!(original, remapped);
        assert_eq!(check_invariants(&mapped, 0, true), 300);
    }

    #[rstest]
    fn test_iterator_reports_exact_size() {
        let root = build(0..64);
        let mut iterator = root.iter();
        assert_eq!(iterator.size_hint(), (64, Some(64)));
        iterator.next();
        assert_eq!(iterator.size_hint(), (63, Some(63)));
        assert_eq!(iterator.count(), 63);
    }
}
