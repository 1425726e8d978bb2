//! Total-order comparators used to sort groups and elements.
//!
//! Every constructor in this crate takes plain comparison closures of the form
//! `Fn(&T, &T) -> Ordering`. The helpers in this module build such closures
//! from other shapes of ordering information.
//!
//! ```
//! use std::cmp::Ordering;
//!
//! use eyeball_im_group::order::{order_by, reverse_order};
//!
//! let by_len = order_by(|s: &&str| s.len());
//! assert_eq!(by_len(&"ab", &"abc"), Ordering::Less);
//!
//! let longest_first = reverse_order(by_len);
//! assert_eq!(longest_first(&"ab", &"abc"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A boxed total-order comparator, as stored by [`SortedGroups`].
///
/// [`SortedGroups`]: crate::SortedGroups
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Compare two values by their [`Ord`] implementation.
pub fn natural_order<T: Ord + ?Sized>(left: &T, right: &T) -> Ordering {
    left.cmp(right)
}

/// Build a comparator that orders values by a key extracted from them.
///
/// This is the comparator equivalent of [`slice::sort_by_key`].
pub fn order_by<T, U, F>(f: F) -> impl Fn(&T, &T) -> Ordering + Send + Sync
where
    U: Ord,
    F: Fn(&T) -> U + Send + Sync,
{
    move |left, right| f(left).cmp(&f(right))
}

/// Reverse the given comparator.
pub fn reverse_order<T, F>(compare: F) -> impl Fn(&T, &T) -> Ordering + Send + Sync
where
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    move |left, right| compare(right, left)
}

/// Chain two comparators: `then` is only consulted for values that `first`
/// considers equal.
pub fn then_order<T, F, G>(first: F, then: G) -> impl Fn(&T, &T) -> Ordering + Send + Sync
where
    F: Fn(&T, &T) -> Ordering + Send + Sync,
    G: Fn(&T, &T) -> Ordering + Send + Sync,
{
    move |left, right| first(left, right).then_with(|| then(left, right))
}

pub(crate) fn boxed<T, F>(compare: F) -> Comparator<T>
where
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    Box::new(compare)
}
