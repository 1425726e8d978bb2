//! Binary search over sorted `Vector`s.
//!
//! All functions take a probe closure that compares an element of the vector
//! against the searched-for value, i.e. `probe(element)` is
//! `compare(element, target)`.

use std::cmp::Ordering;

use eyeball_im::Vector;

/// Index of the first element that does not compare less than the target.
pub(crate) fn lower_bound<T: Clone>(
    values: &Vector<T>,
    mut probe: impl FnMut(&T) -> Ordering,
) -> usize {
    let (mut low, mut high) = (0, values.len());
    while low < high {
        let middle = low + (high - low) / 2;
        if probe(&values[middle]).is_lt() {
            low = middle + 1;
        } else {
            high = middle;
        }
    }
    low
}

/// Index of the first element that compares greater than the target.
///
/// Inserting there puts the new value after every existing equal value.
pub(crate) fn upper_bound<T: Clone>(
    values: &Vector<T>,
    mut probe: impl FnMut(&T) -> Ordering,
) -> usize {
    let (mut low, mut high) = (0, values.len());
    while low < high {
        let middle = low + (high - low) / 2;
        if probe(&values[middle]).is_gt() {
            high = middle;
        } else {
            low = middle + 1;
        }
    }
    low
}

/// Search for the target.
///
/// Returns `Ok` with the index of the first equal element, or `Err` with the
/// index the target would have to be inserted at to keep `values` sorted.
pub(crate) fn search<T: Clone>(
    values: &Vector<T>,
    mut probe: impl FnMut(&T) -> Ordering,
) -> Result<usize, usize> {
    let index = lower_bound(values, &mut probe);
    match values.get(index) {
        Some(value) if probe(value).is_eq() => Ok(index),
        _ => Err(index),
    }
}

/// Find the position of an element that matches `is_target` among those
/// comparing equal to the target, falling back to a linear scan if the order
/// and the match predicate disagree.
pub(crate) fn position<T: Clone>(
    values: &Vector<T>,
    mut probe: impl FnMut(&T) -> Ordering,
    mut is_target: impl FnMut(&T) -> bool,
) -> Option<usize> {
    if let Ok(start) = search(values, &mut probe) {
        let found = values
            .iter()
            .skip(start)
            .take_while(|value| probe(*value).is_eq())
            .position(&mut is_target);
        if let Some(offset) = found {
            return Some(start + offset);
        }
    }

    values.iter().position(is_target)
}
