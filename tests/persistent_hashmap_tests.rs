#![cfg(feature = "persistent")]
//! Integration tests for PersistentHashMap.
//!
//! Exercises the public map API end to end: persistence of old versions,
//! structural sharing, hash collisions, merging and the traversal algebra.

use persistent_map::MapError;
use persistent_map::persistent::{PersistentHashMap, PersistentHashSet};
use rstest::{fixture, rstest};
use std::hash::{Hash, Hasher};

/// Routes `trace!`/`debug!` output to the test harness.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("persistent_map=trace"))
        .with_test_writer()
        .try_init();
}

#[fixture]
fn letters() -> PersistentHashMap<String, i32> {
    PersistentHashMap::new()
        .insert("a".to_string(), 1)
        .insert("b".to_string(), 2)
        .insert("c".to_string(), 3)
}

#[fixture]
fn squares() -> PersistentHashMap<u32, u64> {
    (0..1_000u32)
        .map(|key| (key, u64::from(key) * u64::from(key)))
        .collect()
}

// =============================================================================
// Persistence
// =============================================================================

#[rstest]
fn test_every_version_stays_readable(letters: PersistentHashMap<String, i32>) {
    let with_d = letters.insert("d".to_string(), 4);
    let without_a = with_d.remove("a");
    let replaced_b = without_a.insert("b".to_string(), 20);

    assert_eq!(letters.len(), 3);
    assert_eq!(with_d.len(), 4);
    assert_eq!(without_a.len(), 3);
    assert_eq!(replaced_b.len(), 3);

    assert_eq!(letters.get("a"), Some(&1));
    assert_eq!(with_d.get("a"), Some(&1));
    assert_eq!(without_a.get("a"), None);
    assert_eq!(without_a.get("b"), Some(&2));
    assert_eq!(replaced_b.get("b"), Some(&20));
}

#[rstest]
fn test_insert_then_remove_restores_equality(squares: PersistentHashMap<u32, u64>) {
    let detour = squares.insert(5_000, 1).remove(&5_000);
    assert_eq!(detour, squares);
    assert_eq!(detour.len(), 1_000);
}

#[rstest]
fn test_removing_every_key_empties_the_map(squares: PersistentHashMap<u32, u64>) {
    let emptied = (0..1_000u32).fold(squares.clone(), |map, key| map.remove(&key));
    assert!(emptied.is_empty());
    assert_eq!(emptied.iter().count(), 0);
    assert_eq!(squares.len(), 1_000);
}

#[rstest]
fn test_len_tracks_adds_and_overwrites() {
    let map = (0..100).fold(PersistentHashMap::new(), |map, key| {
        map.insert(key % 10, key)
    });
    assert_eq!(map.len(), 10);
    assert_eq!(map.get(&3), Some(&93));
}

// =============================================================================
// Structural sharing
// =============================================================================

#[rstest]
fn test_absent_removal_shares_root(squares: PersistentHashMap<u32, u64>) {
    assert!(squares.remove(&1_000_000).ptr_eq(&squares));
}

#[rstest]
fn test_clone_shares_root(squares: PersistentHashMap<u32, u64>) {
    let copy = squares.clone();
    assert!(copy.ptr_eq(&squares));
    assert!(!squares.insert(1, 0).ptr_eq(&squares));
}

#[rstest]
fn test_merge_with_self_is_identity(squares: PersistentHashMap<u32, u64>) {
    init_tracing();
    assert!(squares.merge(&squares).ptr_eq(&squares));
}

#[rstest]
fn test_merge_with_derived_version(squares: PersistentHashMap<u32, u64>) {
    init_tracing();
    let derived = squares.insert(2_000, 0).remove(&10);
    let merged = derived.merge(&squares);

    assert_eq!(merged.len(), 1_001);
    assert_eq!(merged.get(&10), Some(&100));
    assert_eq!(merged.get(&2_000), Some(&0));
}

// =============================================================================
// Hash collisions
// =============================================================================

/// A type that always produces the same hash value for collision testing.
#[derive(Clone, PartialEq, Eq, Debug)]
struct CollidingKey {
    value: u32,
}

impl CollidingKey {
    const fn new(value: u32) -> Self {
        Self { value }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        42u64.hash(state);
    }
}

/// Hashes only the low byte, so many keys share hash prefixes without
/// being equal.
#[derive(Clone, PartialEq, Eq, Debug)]
struct LowByteKey(u32);

impl Hash for LowByteKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 & 0xff).hash(state);
    }
}

#[rstest]
fn test_colliding_keys_insert_update_remove() {
    let map: PersistentHashMap<CollidingKey, String> = (1..=5)
        .map(|value| (CollidingKey::new(value), value.to_string()))
        .collect();
    assert_eq!(map.len(), 5);

    let updated = map
        .update(&CollidingKey::new(3), |value| format!("{value}!"))
        .unwrap();
    assert_eq!(updated.get(&CollidingKey::new(3)), Some(&"3!".to_string()));
    assert_eq!(map.get(&CollidingKey::new(3)), Some(&"3".to_string()));

    let removed = (1..=5).fold(map.clone(), |map, value| {
        map.remove(&CollidingKey::new(value))
    });
    assert!(removed.is_empty());
}

#[rstest]
fn test_colliding_keys_mixed_with_distinct_keys() {
    let map: PersistentHashMap<LowByteKey, u32> =
        (0..1_024).map(|value| (LowByteKey(value), value)).collect();
    assert_eq!(map.len(), 1_024);
    assert!((0..1_024).all(|value| map.get(&LowByteKey(value)) == Some(&value)));

    let thinned = (0..1_024)
        .filter(|value| value % 4 != 0)
        .fold(map, |map, value| map.remove(&LowByteKey(value)));
    assert_eq!(thinned.len(), 256);
    assert_eq!(thinned.get(&LowByteKey(512)), Some(&512));
    assert_eq!(thinned.get(&LowByteKey(513)), None);
}

// =============================================================================
// Merge
// =============================================================================

#[rstest]
fn test_end_to_end_example(letters: PersistentHashMap<String, i32>) {
    init_tracing();
    let other = PersistentHashMap::new()
        .insert("b".to_string(), 20)
        .insert("d".to_string(), 4);

    let merged = letters.merge_with(&other, |left, right| left + right);
    let scaled = merged.map_values(|value| value * 10);

    let expected: PersistentHashMap<String, i32> = [("a", 10), ("b", 220), ("c", 30), ("d", 40)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    assert_eq!(scaled, expected);
    assert_eq!(letters.get("b"), Some(&2));
}

#[rstest]
#[case::disjoint(0..50, 50..100, 100)]
#[case::overlapping(0..60, 40..100, 100)]
#[case::nested(0..100, 10..20, 100)]
#[case::empty_right(0..10, 0..0, 10)]
fn test_merge_sizes(
    #[case] left: std::ops::Range<i32>,
    #[case] right: std::ops::Range<i32>,
    #[case] expected: usize,
) {
    let left_map: PersistentHashMap<i32, &str> = left.map(|key| (key, "left")).collect();
    let right_map: PersistentHashMap<i32, &str> = right.clone().map(|key| (key, "right")).collect();

    let merged = left_map.merge(&right_map);
    assert_eq!(merged.len(), expected);
    assert!(right.clone().all(|key| merged.contains_key(&key)));
    assert!(left_map.keys().all(|key| merged.get(key) == Some(&"left")));

    let preferring_right = left_map.merge_with(&right_map, |_, newer| *newer);
    assert!(
        right
            .into_iter()
            .all(|key| preferring_right.get(&key) == Some(&"right"))
    );
}

// =============================================================================
// Partial function and errors
// =============================================================================

#[rstest]
fn test_apply(letters: PersistentHashMap<String, i32>) {
    assert_eq!(letters.apply("c"), Ok(&3));
    let error = letters.apply("zz").unwrap_err();
    assert_eq!(error, MapError::KeyNotFound);
    assert_eq!(error.to_string(), "key not found");
}

#[rstest]
#[case(0, 1)]
#[case(2, 0)]
fn test_windowing_rejects_zero_before_work(#[case] size: usize, #[case] step: usize) {
    init_tracing();
    let map: PersistentHashMap<i32, i32> = (0..5).map(|key| (key, key)).collect();
    assert!(matches!(
        map.sliding_by(size, step),
        Err(MapError::InvalidPartitionParameter { value: 0, .. })
    ));
}

#[rstest]
#[case(usize::MAX, usize::MAX)]
#[case(1 << 40, 1)]
fn test_windowing_accepts_sizes_beyond_length(#[case] size: usize, #[case] step: usize) {
    let map: PersistentHashMap<i32, i32> = (0..5).map(|key| (key, key)).collect();

    let chunks = map.grouped(size).unwrap();
    assert_eq!(chunks, vec![map.clone()]);

    let windows = map.sliding_by(size, step).unwrap();
    assert_eq!(windows, vec![map.clone()]);
}

#[rstest]
fn test_init_and_tail_fail_on_empty_map() {
    let map: PersistentHashMap<i32, i32> = (0..5).map(|key| (key, key)).collect();
    assert_eq!(map.tail().map(|tail| tail.len()), Ok(4));
    assert_eq!(map.init().map(|init| init.len()), Ok(4));

    let empty = map.clear();
    assert_eq!(empty.init(), Err(MapError::EmptyMap { operation: "init" }));
    assert_eq!(
        empty.tail().unwrap_err().to_string(),
        "tail of an empty map"
    );
}

// =============================================================================
// Algebra through the map
// =============================================================================

#[rstest]
fn test_sliding_window_counts() {
    let map: PersistentHashMap<i32, char> = (1..=5).zip('a'..).collect();
    let order: Vec<i32> = map.keys().copied().collect();

    let windows = map.sliding(3).unwrap();
    assert_eq!(windows.len(), 3);
    for (start, window) in windows.iter().enumerate() {
        assert_eq!(window.len(), 3);
        assert!(
            order[start..start + 3]
                .iter()
                .all(|key| window.contains_key(key))
        );
    }

    let stepped = map.sliding_by(2, 2).unwrap();
    let sizes: Vec<usize> = stepped.iter().map(PersistentHashMap::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
}

#[rstest]
fn test_group_by_covers_every_entry(squares: PersistentHashMap<u32, u64>) {
    let groups = squares.group_by(|_, value| value % 7);
    let total: usize = groups.values().map(PersistentHashMap::len).sum();
    assert_eq!(total, squares.len());
    assert!(
        groups
            .iter()
            .all(|(class, group)| group.values().all(|value| value % 7 == *class))
    );
}

#[rstest]
fn test_scan_and_fold_agree(squares: PersistentHashMap<u32, u64>) {
    let running = squares.scan_left(0u64, |total, (_, value)| total + value);
    let folded = squares.fold_left(0u64, |total, (_, value)| total + value);
    assert_eq!(running.len(), squares.len() + 1);
    assert_eq!(running.last(), Some(&folded));
    assert_eq!(
        squares.fold_right(0u64, |(_, value), total| total + value),
        folded
    );
}

#[rstest]
fn test_zip_all_pads_with_defaults(letters: PersistentHashMap<String, i32>) {
    let pairs = letters.zip_all(vec![true], ("?".to_string(), 0), false);
    assert_eq!(pairs.len(), 3);
    assert!(pairs[0].1);
    assert!(pairs[1..].iter().all(|(_, flag)| !flag));
}

#[rstest]
fn test_unzip_keeps_pairs_aligned(letters: PersistentHashMap<String, i32>) {
    let (keys, values) = letters.unzip(|key, value| (key.clone(), *value));
    for (key, value) in keys.iter().zip(&values) {
        assert_eq!(letters.get(key), Some(value));
    }
}

#[rstest]
fn test_key_set_is_a_set(letters: PersistentHashMap<String, i32>) {
    let keys = letters.key_set();
    let expected: PersistentHashSet<String> =
        ["a", "b", "c"].iter().map(ToString::to_string).collect();
    assert_eq!(keys, expected);
    assert!(letters.keys().eq(keys.iter()));
}

#[rstest]
fn test_transform_and_traverse(letters: PersistentHashMap<String, i32>) {
    let rendered = letters.traverse(|key, value| format!("{key}={value}"));
    assert_eq!(rendered.len(), 3);
    assert!(rendered.contains(&"b=2".to_string()));

    let total = letters.transform(|map| map.values().sum::<i32>());
    assert_eq!(total, 6);
}
