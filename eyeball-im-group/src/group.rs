use std::{cmp::Ordering, fmt, ptr};

use eyeball_im::{ObservableVector, Vector, VectorSubscriber};
use readlock::{Shared, SharedReadLock};

use crate::search;

/// A group of elements sharing one key, as exposed by [`SortedGroups`] and
/// [`GroupIndex`].
///
/// `Group` is a cheap handle that can be cloned and kept around. Its elements
/// are sorted by the element order of the index it belongs to, and only that
/// index can change them. Once the index drops the group, the handle keeps
/// showing the last elements it had.
///
/// [`SortedGroups`]: crate::SortedGroups
/// [`GroupIndex`]: crate::GroupIndex
pub struct Group<K, T> {
    key: K,
    elements: SharedReadLock<ObservableVector<T>>,
}

impl<K, T> Group<K, T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The key shared by all elements of this group.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Get a clone of the group's current elements, in sorted order.
    pub fn elements(&self) -> Vector<T> {
        (**self.elements.lock()).clone()
    }

    /// Get a clone of the element at the given position.
    pub fn get(&self, index: usize) -> Option<T> {
        self.elements.lock().get(index).cloned()
    }

    /// The number of elements in this group.
    pub fn len(&self) -> usize {
        self.elements.lock().len()
    }

    /// Whether this group has no elements.
    ///
    /// This is never the case for a group that is still part of an index.
    pub fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }

    /// Obtain a new subscriber for the group's elements.
    ///
    /// Elements being inserted or removed by the owning index are broadcast as
    /// [`VectorDiff::Insert`][eyeball_im::VectorDiff::Insert] and
    /// [`VectorDiff::Remove`][eyeball_im::VectorDiff::Remove].
    pub fn subscribe(&self) -> VectorSubscriber<T> {
        self.elements.lock().subscribe()
    }
}

impl<K: Clone, T> Clone for Group<K, T> {
    fn clone(&self) -> Self {
        Self { key: self.key.clone(), elements: self.elements.clone() }
    }
}

impl<K, T> fmt::Debug for Group<K, T>
where
    K: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = self.elements.lock();
        f.debug_struct("Group").field("key", &self.key).field("elements", &**elements).finish()
    }
}

/// The write side of a group's element list, owned by the index.
pub(crate) struct GroupSlot<T> {
    elements: Shared<ObservableVector<T>>,
}

impl<T> GroupSlot<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a slot holding a single element.
    pub(crate) fn new(first: T, capacity: usize) -> Self {
        let mut elements = ObservableVector::with_capacity(capacity);
        elements.push_back(first);
        Self { elements: Shared::new(elements) }
    }

    /// Create a read-only view of this slot.
    pub(crate) fn view<K>(&self, key: K) -> Group<K, T> {
        Group { key, elements: Shared::get_read_lock(&self.elements) }
    }

    pub(crate) fn elements(&self) -> &Vector<T> {
        &self.elements
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `group` is a view of this slot's element list, as opposed to a
    /// different list that happens to hold the same elements.
    pub(crate) fn is_viewed_by<K>(&self, group: &Group<K, T>) -> bool {
        let elements: &ObservableVector<T> = &self.elements;
        ptr::eq(elements, &*group.elements.lock())
    }

    /// Insert `item` after every element that doesn't compare greater than it,
    /// returning its position.
    pub(crate) fn insert_sorted(
        &mut self,
        item: T,
        order: &(dyn Fn(&T, &T) -> Ordering + Send + Sync),
    ) -> usize {
        let index = search::upper_bound(self.elements(), |probe| order(probe, &item));
        Shared::lock(&mut self.elements).insert(index, item);
        index
    }

    /// Remove the first element equal to `item`, returning its former
    /// position.
    pub(crate) fn remove(
        &mut self,
        item: &T,
        order: &(dyn Fn(&T, &T) -> Ordering + Send + Sync),
    ) -> Option<usize>
    where
        T: PartialEq,
    {
        let index = search::position(self.elements(), |probe| order(probe, item), |e| e == item)?;
        Shared::lock(&mut self.elements).remove(index);
        Some(index)
    }

    /// Remove all elements, so that stale handles to the group don't keep
    /// showing them.
    pub(crate) fn clear(&mut self) {
        Shared::lock(&mut self.elements).clear();
    }
}
