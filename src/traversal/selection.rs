//! Filtering, splitting, and slicing of the canonical entry sequence.
//!
//! Operations that split a container (`partition`, `span`) return two
//! disjoint containers whose union is the input.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::{EntrySequence, cloned_entry};
use crate::error::MapError;

/// Keeps the entries that satisfy `predicate`.
pub fn filter<S, T, P>(source: &S, mut predicate: P) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    source
        .entries()
        .filter(|&(key, value)| predicate(key, value))
        .map(cloned_entry)
        .collect()
}

/// Keeps the entries that do not satisfy `predicate`.
pub fn filter_not<S, T, P>(source: &S, mut predicate: P) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    filter(source, |key, value| !predicate(key, value))
}

/// Splits entries into those that satisfy `predicate` and those that don't.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use persistent_map::traversal;
///
/// let map: BTreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
/// let (odd, even): (BTreeMap<_, _>, BTreeMap<_, _>) =
///     traversal::partition(&map, |key, _| key % 2 == 1);
/// assert_eq!(odd.len(), 2);
/// assert_eq!(even.len(), 1);
/// ```
pub fn partition<S, T, P>(source: &S, mut predicate: P) -> (T, T)
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (key, value) in source.entries() {
        if predicate(key, value) {
            accepted.push(cloned_entry((key, value)));
        } else {
            rejected.push(cloned_entry((key, value)));
        }
    }
    (
        accepted.into_iter().collect(),
        rejected.into_iter().collect(),
    )
}

/// Splits entries at the first one that fails `predicate`.
///
/// The first container holds the longest prefix satisfying `predicate`, the
/// second holds everything after it.
pub fn span<S, T, P>(source: &S, mut predicate: P) -> (T, T)
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    let mut prefix = Vec::new();
    let mut rest = Vec::new();
    let mut in_prefix = true;
    for (key, value) in source.entries() {
        in_prefix = in_prefix && predicate(key, value);
        if in_prefix {
            prefix.push(cloned_entry((key, value)));
        } else {
            rest.push(cloned_entry((key, value)));
        }
    }
    (prefix.into_iter().collect(), rest.into_iter().collect())
}

/// Keeps the longest prefix whose entries satisfy `predicate`.
pub fn take_while<S, T, P>(source: &S, mut predicate: P) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    source
        .entries()
        .take_while(|&(key, value)| predicate(key, value))
        .map(cloned_entry)
        .collect()
}

/// Drops the longest prefix whose entries satisfy `predicate`.
pub fn drop_while<S, T, P>(source: &S, mut predicate: P) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    source
        .entries()
        .skip_while(|&(key, value)| predicate(key, value))
        .map(cloned_entry)
        .collect()
}

/// Keeps entries up to, not including, the first one satisfying `predicate`.
pub fn take_until<S, T, P>(source: &S, mut predicate: P) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    take_while(source, |key, value| !predicate(key, value))
}

/// Drops entries up to, not including, the first one satisfying `predicate`.
pub fn drop_until<S, T, P>(source: &S, mut predicate: P) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    P: FnMut(&S::Key, &S::Value) -> bool,
{
    drop_while(source, |key, value| !predicate(key, value))
}

/// Keeps the first `count` entries.
pub fn take<S, T>(source: &S, count: usize) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    source.entries().take(count).map(cloned_entry).collect()
}

/// Drops the first `count` entries.
pub fn drop<S, T>(source: &S, count: usize) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    source.entries().skip(count).map(cloned_entry).collect()
}

/// Keeps the last `count` entries.
pub fn take_right<S, T>(source: &S, count: usize) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    let skipped = source.entry_count().saturating_sub(count);
    drop(source, skipped)
}

/// Drops the last `count` entries.
pub fn drop_right<S, T>(source: &S, count: usize) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    let kept = source.entry_count().saturating_sub(count);
    take(source, kept)
}

/// The first entry in canonical order.
pub fn head_option<S>(source: &S) -> Option<(S::Key, S::Value)>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
{
    source.entries().next().map(cloned_entry)
}

/// Everything but the first entry, or `None` when there are no entries.
pub fn tail_option<S, T>(source: &S) -> Option<T>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    let mut entries = source.entries();
    entries.next()?;
    Some(entries.map(cloned_entry).collect())
}

/// Everything but the last entry, or `None` when there are no entries.
pub fn init_option<S, T>(source: &S) -> Option<T>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    let count = source.entry_count();
    (count > 0).then(|| take(source, count - 1))
}

/// Everything but the first entry.
///
/// # Errors
///
/// Returns [`MapError::EmptyMap`] when there are no entries.
pub fn tail<S, T>(source: &S) -> Result<T, MapError>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    tail_option(source).ok_or(MapError::EmptyMap { operation: "tail" })
}

/// Everything but the last entry.
///
/// # Errors
///
/// Returns [`MapError::EmptyMap`] when there are no entries.
pub fn init<S, T>(source: &S) -> Result<T, MapError>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    init_option(source).ok_or(MapError::EmptyMap { operation: "init" })
}

/// Keeps the first entry for each distinct result of `key_extractor`.
pub fn distinct_by<S, T, U, F>(source: &S, mut key_extractor: F) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
    U: Hash + Eq,
    F: FnMut(&S::Key, &S::Value) -> U,
{
    let mut seen = HashSet::new();
    source
        .entries()
        .filter(|&(key, value)| seen.insert(key_extractor(key, value)))
        .map(cloned_entry)
        .collect()
}

/// Keeps the entries that also occur in `elements`.
pub fn retain_all<S, T, I>(source: &S, elements: I) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone + Hash + Eq,
    S::Value: Clone + PartialEq,
    T: FromIterator<(S::Key, S::Value)>,
    I: IntoIterator<Item = (S::Key, S::Value)>,
{
    let mut wanted: HashMap<S::Key, Vec<S::Value>> = HashMap::new();
    for (key, value) in elements {
        wanted.entry(key).or_default().push(value);
    }
    filter(source, |key, value| {
        wanted
            .get(key)
            .is_some_and(|candidates| candidates.contains(value))
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{five_letters, keys_of};
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    type Letters = BTreeMap<i32, &'static str>;

    #[rstest]
    fn test_filter_and_filter_not_are_complementary() {
        let map = five_letters();
        let kept: Letters = filter(&map, |key, _| *key > 2);
        let dropped: Letters = filter_not(&map, |key, _| *key > 2);
        assert_eq!(keys_of(&kept), vec![3, 4, 5]);
        assert_eq!(keys_of(&dropped), vec![1, 2]);
    }

    #[rstest]
    fn test_partition_is_disjoint_and_total() {
        let map = five_letters();
        let (even, odd): (Letters, Letters) = partition(&map, |key, _| key % 2 == 0);
        assert_eq!(keys_of(&even), vec![2, 4]);
        assert_eq!(keys_of(&odd), vec![1, 3, 5]);
    }

    #[rstest]
    fn test_span_stops_at_first_failure() {
        let map = five_letters();
        let (prefix, rest): (Letters, Letters) = span(&map, |key, _| *key != 3);
        assert_eq!(keys_of(&prefix), vec![1, 2]);
        assert_eq!(keys_of(&rest), vec![3, 4, 5]);
    }

    #[rstest]
    fn test_span_does_not_resume_after_failure() {
        let map = five_letters();
        let (prefix, rest): (Letters, Letters) = span(&map, |key, _| *key % 2 == 1);
        assert_eq!(keys_of(&prefix), vec![1]);
        assert_eq!(keys_of(&rest), vec![2, 3, 4, 5]);
    }

    #[rstest]
    #[case(0, vec![], vec![1, 2, 3, 4, 5])]
    #[case(2, vec![1, 2], vec![3, 4, 5])]
    #[case(9, vec![1, 2, 3, 4, 5], vec![])]
    fn test_take_and_drop(
        #[case] count: usize,
        #[case] taken: Vec<i32>,
        #[case] dropped: Vec<i32>,
    ) {
        let map = five_letters();
        assert_eq!(keys_of(&take::<_, Letters>(&map, count)), taken);
        assert_eq!(keys_of(&drop::<_, Letters>(&map, count)), dropped);
    }

    #[rstest]
    fn test_take_right_and_drop_right() {
        let map = five_letters();
        assert_eq!(keys_of(&take_right::<_, Letters>(&map, 2)), vec![4, 5]);
        assert_eq!(keys_of(&drop_right::<_, Letters>(&map, 2)), vec![1, 2, 3]);
        assert!(drop_right::<_, Letters>(&map, 10).is_empty());
    }

    #[rstest]
    fn test_while_and_until() {
        let map = five_letters();
        let taken: Letters = take_while(&map, |key, _| *key < 3);
        let dropped: Letters = drop_while(&map, |key, _| *key < 3);
        let taken_until: Letters = take_until(&map, |_, value| *value == "d");
        let dropped_until: Letters = drop_until(&map, |_, value| *value == "d");
        assert_eq!(keys_of(&taken), vec![1, 2]);
        assert_eq!(keys_of(&dropped), vec![3, 4, 5]);
        assert_eq!(keys_of(&taken_until), vec![1, 2, 3]);
        assert_eq!(keys_of(&dropped_until), vec![4, 5]);
    }

    #[rstest]
    fn test_head_tail_init() {
        let map = five_letters();
        assert_eq!(head_option(&map), Some((1, "a")));
        assert_eq!(
            keys_of(&tail_option::<_, Letters>(&map).unwrap()),
            vec![2, 3, 4, 5]
        );
        assert_eq!(
            keys_of(&init_option::<_, Letters>(&map).unwrap()),
            vec![1, 2, 3, 4]
        );

        let empty = Letters::new();
        assert_eq!(head_option(&empty), None);
        assert!(tail_option::<_, Letters>(&empty).is_none());
        assert!(init_option::<_, Letters>(&empty).is_none());
    }

    #[rstest]
    fn test_init_and_tail_require_entries() {
        let map = five_letters();
        assert_eq!(
            keys_of(&tail::<_, Letters>(&map).unwrap()),
            vec![2, 3, 4, 5]
        );
        assert_eq!(
            keys_of(&init::<_, Letters>(&map).unwrap()),
            vec![1, 2, 3, 4]
        );

        let empty = Letters::new();
        assert_eq!(
            tail::<_, Letters>(&empty),
            Err(MapError::EmptyMap { operation: "tail" })
        );
        assert_eq!(
            init::<_, Letters>(&empty),
            Err(MapError::EmptyMap { operation: "init" })
        );
    }

    #[rstest]
    fn test_distinct_by_keeps_first_occurrence() {
        let map: BTreeMap<i32, &str> = [(1, "x"), (2, "y"), (3, "x"), (4, "z")]
            .into_iter()
            .collect();
        let distinct: Letters = distinct_by(&map, |_, value| *value);
        assert_eq!(keys_of(&distinct), vec![1, 2, 4]);
    }

    #[rstest]
    fn test_retain_all_matches_whole_entries() {
        let map = five_letters();
        let retained: Letters = retain_all(&map, vec![(1, "a"), (2, "z"), (5, "e"), (9, "q")]);
        assert_eq!(keys_of(&retained), vec![1, 5]);
    }
}
