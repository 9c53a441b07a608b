//! Scans, unzipping and zipping.

use std::mem;

use super::{EntrySequence, cloned_entry};

/// Running states of a left-to-right scan, starting with `zero`.
///
/// The result has one more element than the source has entries.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use persistent_map::traversal;
///
/// let map: BTreeMap<char, i32> = [('a', 1), ('b', 2), ('c', 3)].into_iter().collect();
/// let totals = traversal::scan_left(&map, 0, |total, (_, value)| total + value);
/// assert_eq!(totals, vec![0, 1, 3, 6]);
/// ```
pub fn scan_left<S, U, F>(source: &S, zero: U, mut operation: F) -> Vec<U>
where
    S: EntrySequence + ?Sized,
    F: FnMut(&U, (&S::Key, &S::Value)) -> U,
{
    let mut states = Vec::with_capacity(source.entry_count() + 1);
    let mut state = zero;
    for entry in source.entries() {
        let next = operation(&state, entry);
        states.push(mem::replace(&mut state, next));
    }
    states.push(state);
    states
}

/// Running states of a right-to-left scan. `zero` is the last element.
pub fn scan_right<S, U, F>(source: &S, zero: U, mut operation: F) -> Vec<U>
where
    S: EntrySequence + ?Sized,
    F: FnMut((&S::Key, &S::Value), &U) -> U,
{
    let entries: Vec<_> = source.entries().collect();
    let mut states = Vec::with_capacity(entries.len() + 1);
    let mut state = zero;
    for entry in entries.into_iter().rev() {
        let next = operation(entry, &state);
        states.push(mem::replace(&mut state, next));
    }
    states.push(state);
    states.reverse();
    states
}

/// Left scan whose states are entries, rebuilt into a container.
///
/// Because states become entries, states sharing a key collapse to the
/// last one.
pub fn scan<S, T, F>(source: &S, zero: (S::Key, S::Value), operation: F) -> T
where
    S: EntrySequence + ?Sized,
    T: FromIterator<(S::Key, S::Value)>,
    F: FnMut(&(S::Key, S::Value), (&S::Key, &S::Value)) -> (S::Key, S::Value),
{
    scan_left(source, zero, operation).into_iter().collect()
}

/// Splits every entry into two parts.
pub fn unzip<S, A, B, F>(source: &S, mut splitter: F) -> (Vec<A>, Vec<B>)
where
    S: EntrySequence + ?Sized,
    F: FnMut(&S::Key, &S::Value) -> (A, B),
{
    source
        .entries()
        .map(|(key, value)| splitter(key, value))
        .unzip()
}

/// Splits every entry into three parts.
pub fn unzip3<S, A, B, C, F>(source: &S, mut splitter: F) -> (Vec<A>, Vec<B>, Vec<C>)
where
    S: EntrySequence + ?Sized,
    F: FnMut(&S::Key, &S::Value) -> (A, B, C),
{
    let count = source.entry_count();
    let mut firsts = Vec::with_capacity(count);
    let mut seconds = Vec::with_capacity(count);
    let mut thirds = Vec::with_capacity(count);
    for (key, value) in source.entries() {
        let (first, second, third) = splitter(key, value);
        firsts.push(first);
        seconds.push(second);
        thirds.push(third);
    }
    (firsts, seconds, thirds)
}

/// Pairs entries with the elements of `that`, stopping at the shorter side.
pub fn zip<S, I>(source: &S, that: I) -> Vec<((S::Key, S::Value), I::Item)>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    I: IntoIterator,
{
    source.entries().map(cloned_entry).zip(that).collect()
}

/// Pairs entries with the elements of `that`, padding the shorter side with
/// `this_element` or `that_element`.
pub fn zip_all<S, I>(
    source: &S,
    that: I,
    this_element: (S::Key, S::Value),
    that_element: I::Item,
) -> Vec<((S::Key, S::Value), I::Item)>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
    I: IntoIterator,
    I::Item: Clone,
{
    let mut these = source.entries().map(cloned_entry);
    let mut those = that.into_iter();
    let mut pairs = Vec::with_capacity(source.entry_count());
    loop {
        match (these.next(), those.next()) {
            (Some(entry), Some(element)) => pairs.push((entry, element)),
            (Some(entry), None) => pairs.push((entry, that_element.clone())),
            (None, Some(element)) => pairs.push((this_element.clone(), element)),
            (None, None) => return pairs,
        }
    }
}

/// Pairs every entry with its position in canonical order.
pub fn zip_with_index<S>(source: &S) -> Vec<((S::Key, S::Value), usize)>
where
    S: EntrySequence + ?Sized,
    S::Key: Clone,
    S::Value: Clone,
{
    source
        .entries()
        .map(cloned_entry)
        .enumerate()
        .map(|(index, entry)| (entry, index))
        .collect()
}
