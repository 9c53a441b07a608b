//! Grouping and windowing of the canonical entry sequence.

use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;

use super::{EntrySequence, cloned_entry};
use crate::error::MapError;

/// Groups entries by the result of `classifier`.
///
/// Groups appear in the order their first entry was seen; entries keep
/// their canonical order inside each group.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use persistent_map::traversal;
///
/// let map: BTreeMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
/// let groups: BTreeMap<bool, BTreeMap<i32, char>> =
///     traversal::group_by(&map, |key, _| key % 2 == 0);
/// assert_eq!(groups[&false].len(), 2);
/// assert_eq!(groups[&true].len(), 1);
/// ```
pub fn group_by<S, G, T, C, F>(source: &S, mut classifier: F) -> G
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    C: Hash + Eq + Clone,
    T: FromIterator<(S::Key, S::Value)>,
    G: FromIterator<(C, T)>,
    F: FnMut(&S::Key, &S::Value) -> C,
{
    match try_group_by(source, |key, value| {
        Ok::<_, Infallible>(classifier(key, value))
    }) {
        Ok(groups) => groups,
        Err(never) => match never {},
    }
}

/// Groups entries by the result of a fallible `classifier`.
///
/// The first classifier error aborts grouping; no partial result is built.
pub fn try_group_by<S, G, T, C, E, F>(source: &S, mut classifier: F) -> Result<G, E>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    C: Hash + Eq + Clone,
    T: FromIterator<(S::Key, S::Value)>,
    G: FromIterator<(C, T)>,
    F: FnMut(&S::Key, &S::Value) -> Result<C, E>,
{
    let mut groups: Vec<(C, Vec<(S::Key, S::Value)>)> = Vec::new();
    let mut positions: HashMap<C, usize> = HashMap::new();

    for (key, value) in source.entries() {
        let class = classifier(key, value)?;
        let position = match positions.get(&class) {
            Some(position) => *position,
            None => {
                positions.insert(class.clone(), groups.len());
                groups.push((class, Vec::new()));
                groups.len() - 1
            }
        };
        groups[position].1.push(cloned_entry((key, value)));
    }

    Ok(groups
        .into_iter()
        .map(|(class, entries)| (class, entries.into_iter().collect()))
        .collect())
}

/// Chunks entries into non-overlapping containers of `size` entries; the
/// last one may be smaller.
///
/// # Errors
///
/// Returns [`MapError::InvalidPartitionParameter`] when `size` is zero.
pub fn grouped<S, T>(source: &S, size: usize) -> Result<Vec<T>, MapError>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    let size = MapError::require_positive("grouped", "size", size)?;
    let mut chunks = Vec::with_capacity(source.entry_count().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(source.entry_count()));

    for entry in source.entries() {
        current.push(cloned_entry(entry));
        if current.len() == size {
            chunks.push(current.drain(..).collect());
        }
    }
    if !current.is_empty() {
        chunks.push(current.into_iter().collect());
    }
    Ok(chunks)
}

/// Sliding windows of `size` entries advancing one entry at a time.
///
/// # Errors
///
/// Returns [`MapError::InvalidPartitionParameter`] when `size` is zero.
pub fn sliding<S, T>(source: &S, size: usize) -> Result<Vec<T>, MapError>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    sliding_by(source, size, 1)
}

/// Sliding windows of up to `size` entries, each starting `step` entries
/// after the previous one.
///
/// Consecutive windows overlap by `size - step` entries when `step < size`.
/// Windowing stops with the first window that reaches the last entry, so
/// five entries with `size = 3, step = 1` give exactly three windows.
///
/// # Errors
///
/// Returns [`MapError::InvalidPartitionParameter`] when `size` or `step` is
/// zero.
pub fn sliding_by<S, T>(source: &S, size: usize, step: usize) -> Result<Vec<T>, MapError>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    T: FromIterator<(S::Key, S::Value)>,
{
    let size = MapError::require_positive("sliding", "size", size)?;
    let step = MapError::require_positive("sliding", "step", step)?;

    let entries: Vec<(&S::Key, &S::Value)> = source.entries().collect();
    let mut windows = Vec::new();
    let mut start = 0;

    while start < entries.len() {
        let end = (start + size).min(entries.len());
        windows.push(
            entries[start..end]
                .iter()
                .copied()
                .map(cloned_entry)
                .collect(),
        );
        if end == entries.len() {
            break;
        }
        start += step;
    }
    Ok(windows)
}
