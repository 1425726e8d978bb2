use std::{cmp::Ordering, hash::Hash};

use crate::{order::natural_order, GroupIndex, ObservableSource};

/// Extension trait for [`ObservableSource`].
pub trait SourceExt<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a [`GroupIndex`] that follows this source.
    ///
    /// Shorthand for [`GroupIndex::new`].
    fn group_by<K, S, KO, EO>(
        &self,
        selector: S,
        key_order: KO,
        element_order: EO,
    ) -> GroupIndex<K, T>
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        S: Fn(&T) -> K + Send + Sync + 'static,
        KO: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static;

    /// Create a [`GroupIndex`] that follows this source, sorting keys and
    /// elements by their [`Ord`] implementations.
    fn group_by_ord<K, S>(&self, selector: S) -> GroupIndex<K, T>
    where
        K: Clone + Ord + Hash + Send + Sync + 'static,
        T: Ord,
        S: Fn(&T) -> K + Send + Sync + 'static;

    /// Create a [`GroupIndex`] that follows this source, sorting keys by
    /// their [`Ord`] implementation and elements by `element_order`.
    fn group_by_with_element_order<K, S, EO>(
        &self,
        selector: S,
        element_order: EO,
    ) -> GroupIndex<K, T>
    where
        K: Clone + Ord + Hash + Send + Sync + 'static,
        S: Fn(&T) -> K + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static;
}

impl<T> SourceExt<T> for ObservableSource<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn group_by<K, S, KO, EO>(
        &self,
        selector: S,
        key_order: KO,
        element_order: EO,
    ) -> GroupIndex<K, T>
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        S: Fn(&T) -> K + Send + Sync + 'static,
        KO: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        GroupIndex::new(self, selector, key_order, element_order)
    }

    fn group_by_ord<K, S>(&self, selector: S) -> GroupIndex<K, T>
    where
        K: Clone + Ord + Hash + Send + Sync + 'static,
        T: Ord,
        S: Fn(&T) -> K + Send + Sync + 'static,
    {
        GroupIndex::with_natural_order(self, selector)
    }

    fn group_by_with_element_order<K, S, EO>(
        &self,
        selector: S,
        element_order: EO,
    ) -> GroupIndex<K, T>
    where
        K: Clone + Ord + Hash + Send + Sync + 'static,
        S: Fn(&T) -> K + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        GroupIndex::new(self, selector, natural_order, element_order)
    }
}
