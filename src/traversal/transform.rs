//! Entry transformations and folds.

use super::EntrySequence;

/// Rebuilds a container from transformed entries.
///
/// Entries are inserted in canonical order, so when `mapper` produces the
/// same key twice the later entry wins.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use persistent_map::traversal;
///
/// let map: BTreeMap<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
/// let swapped: BTreeMap<i32, i32> = traversal::map(&map, |key, value| (*value, *key));
/// assert_eq!(swapped.get(&10), Some(&1));
/// ```
pub fn map<S, T, U, W, F>(source: &S, mut mapper: F) -> T
where
    S: EntrySequence + ?Sized,
    T: FromIterator<(U, W)>,
    F: FnMut(&S::Key, &S::Value) -> (U, W),
{
    source
        .entries()
        .map(|(key, value)| mapper(key, value))
        .collect()
}

/// Rebuilds a container from every entry each source entry fans out to.
///
/// Later entries win on key collision, as with [`map`].
pub fn flat_map<S, T, U, W, I, F>(source: &S, mut mapper: F) -> T
where
    S: EntrySequence + ?Sized,
    T: FromIterator<(U, W)>,
    I: IntoIterator<Item = (U, W)>,
    F: FnMut(&S::Key, &S::Value) -> I,
{
    source
        .entries()
        .flat_map(|(key, value)| mapper(key, value))
        .collect()
}

/// Maps every value while keeping its key.
pub fn map_values<S, T, W, F>(source: &S, mut mapper: F) -> T
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    T: FromIterator<(S::Key, W)>,
    F: FnMut(&S::Value) -> W,
{
    source
        .entries()
        .map(|(key, value)| (key.clone(), mapper(value)))
        .collect()
}

/// Maps every entry to a single element, in canonical order.
pub fn traverse<S, U, F>(source: &S, mut mapper: F) -> Vec<U>
where
    S: EntrySequence + ?Sized,
    F: FnMut(&S::Key, &S::Value) -> U,
{
    source
        .entries()
        .map(|(key, value)| mapper(key, value))
        .collect()
}

/// Folds entries from first to last.
pub fn fold_left<S, B, F>(source: &S, init: B, mut function: F) -> B
where
    S: EntrySequence + ?Sized,
    F: FnMut(B, (&S::Key, &S::Value)) -> B,
{
    source
        .entries()
        .fold(init, |accumulator, entry| function(accumulator, entry))
}

/// Folds entries from last to first.
pub fn fold_right<S, B, F>(source: &S, init: B, mut function: F) -> B
where
    S: EntrySequence + ?Sized,
    F: FnMut((&S::Key, &S::Value), B) -> B,
{
    let entries: Vec<_> = source.entries().collect();
    entries
        .into_iter()
        .rev()
        .fold(init, |accumulator, entry| function(entry, accumulator))
}
