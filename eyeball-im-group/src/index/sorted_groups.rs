use std::{
    cmp::Ordering,
    collections::{hash_map::Entry, HashMap},
    fmt,
    hash::Hash,
};

use eyeball_im::{ObservableVector, Vector, VectorSubscriber};

use super::{GroupingConfig, Insertion, Removal, SyncReport};
use crate::{
    group::{Group, GroupSlot},
    order::{self, Comparator},
    search, SourceChange,
};

/// The grouped, sorted projection of a list, updated one change at a time.
///
/// `SortedGroups` holds a list of [`Group`]s sorted by `key_order`, each
/// holding its elements sorted by `element_order`. It is not attached to
/// anything: feed it changes through [`apply`][Self::apply], or element by
/// element through [`add_element`][Self::add_element] and
/// [`remove_element`][Self::remove_element]. [`GroupIndex`] does this
/// automatically for an [`ObservableSource`].
///
/// After every call that takes `&mut self`, the following holds:
///
/// - groups are sorted by key, elements of each group are sorted
/// - no group is empty
/// - there is exactly one group per key
///
/// Elements that compare equal under `element_order` are kept in the order
/// they were added in.
///
/// [`GroupIndex`]: crate::GroupIndex
/// [`ObservableSource`]: crate::ObservableSource
pub struct SortedGroups<K, T> {
    selector: Box<dyn Fn(&T) -> K + Send + Sync>,
    key_order: Comparator<K>,
    element_order: Comparator<T>,
    groups: ObservableVector<Group<K, T>>,
    lookup: HashMap<K, GroupSlot<T>>,
    elements_capacity: usize,
}

impl<K, T> SortedGroups<K, T>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an empty `SortedGroups`.
    ///
    /// `selector` derives the key of an element and must return the same key
    /// for an element every time it is called. `key_order` and
    /// `element_order` must be total orders.
    pub fn new<S, KO, EO>(selector: S, key_order: KO, element_order: EO) -> Self
    where
        S: Fn(&T) -> K + Send + Sync + 'static,
        KO: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::with_config(selector, key_order, element_order, GroupingConfig::default())
    }

    /// Create an empty `SortedGroups` with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if one of the configured capacities is `0`.
    #[track_caller]
    pub fn with_config<S, KO, EO>(
        selector: S,
        key_order: KO,
        element_order: EO,
        config: GroupingConfig,
    ) -> Self
    where
        S: Fn(&T) -> K + Send + Sync + 'static,
        KO: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        assert!(config.groups_capacity > 0, "groups capacity must not be 0");
        assert!(config.elements_capacity > 0, "elements capacity must not be 0");

        Self {
            selector: Box::new(selector),
            key_order: order::boxed(key_order),
            element_order: order::boxed(element_order),
            groups: ObservableVector::with_capacity(config.groups_capacity),
            lookup: HashMap::new(),
            elements_capacity: config.elements_capacity,
        }
    }

    /// Apply a change of the underlying list.
    ///
    /// `current` is the content of the list after the change; it is only
    /// read for [`SourceChange::Reset`].
    ///
    /// Removed elements are always processed before added ones, so that
    /// replacing an element by one with a different key works as expected.
    /// [`SourceChange::Move`] is ignored: the projection has its own order,
    /// which doesn't depend on positions in the list.
    pub fn apply(&mut self, change: &SourceChange<T>, current: &Vector<T>) -> SyncReport {
        let mut report = SyncReport::default();

        match change {
            SourceChange::Add { values, .. } => {
                for value in values {
                    report.record_insertion(self.add_element(value.clone()));
                }
            }
            SourceChange::Remove { values, .. } => {
                for value in values {
                    report.record_removal(self.remove_element(value));
                }
            }
            SourceChange::Replace { removed, added, .. } => {
                for value in removed {
                    report.record_removal(self.remove_element(value));
                }
                for value in added {
                    report.record_insertion(self.add_element(value.clone()));
                }
            }
            SourceChange::Move { .. } => {
                #[cfg(feature = "tracing")]
                tracing::trace!(target: "eyeball_im_group::index::sync", "Ignoring move");

                return report;
            }
            SourceChange::Reset => {
                report = self.reset(current);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::index::sync",
            inserted = report.inserted,
            removed = report.removed,
            untracked = report.untracked,
            groups_created = report.groups_created,
            groups_removed = report.groups_removed,
            "Applied source change"
        );

        report
    }

    /// Drop all groups and rebuild them from `values`, in order.
    pub fn reset(&mut self, values: &Vector<T>) -> SyncReport {
        let mut report = SyncReport { groups_removed: self.lookup.len(), ..Default::default() };

        for (_, mut slot) in self.lookup.drain() {
            report.removed += slot.elements().len();
            slot.clear();
        }
        self.groups.clear();

        for value in values {
            report.record_insertion(self.add_element(value.clone()));
        }

        report
    }

    /// Add an element to the group for its key, creating the group if needed.
    ///
    /// A new group is inserted into the group list with its first element
    /// already in place, so subscribers never see an empty group.
    pub fn add_element(&mut self, item: T) -> Insertion {
        let key = (self.selector)(&item);

        match self.lookup.entry(key) {
            Entry::Occupied(mut entry) => {
                let _index = entry.get_mut().insert_sorted(item, &*self.element_order);

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "eyeball_im_group::index::update",
                    "insert(index = {_index})"
                );

                Insertion::Inserted
            }
            Entry::Vacant(entry) => {
                let slot = GroupSlot::new(item, self.elements_capacity);
                let key_order = &self.key_order;
                let index =
                    search::upper_bound(&*self.groups, |group| key_order(group.key(), entry.key()));

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target: "eyeball_im_group::index::update",
                    "create_group(index = {index})"
                );

                self.groups.insert(index, slot.view(entry.key().clone()));
                entry.insert(slot);

                Insertion::CreatedGroup
            }
        }
    }

    /// Remove an element from the group for its key, removing the group if it
    /// becomes empty.
    ///
    /// If the element is equal to several elements of its group, only the
    /// first one is removed.
    pub fn remove_element(&mut self, item: &T) -> Removal {
        let key = (self.selector)(item);

        let Some(slot) = self.lookup.get_mut(&key) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "eyeball_im_group::index::update",
                "Ignoring removal of an element without a group"
            );

            return Removal::UntrackedKey;
        };

        let Some(_index) = slot.remove(item, &*self.element_order) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "eyeball_im_group::index::update",
                "Ignoring removal of an element missing from its group"
            );

            return Removal::UntrackedElement;
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(target: "eyeball_im_group::index::update", "remove(index = {_index})");

        if !slot.is_empty() {
            return Removal::Removed;
        }

        self.lookup.remove(&key);
        if let Some(index) = self.group_position(&key) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "eyeball_im_group::index::update",
                "remove_group(index = {index})"
            );

            self.groups.remove(index);
        }

        Removal::RemovedGroup
    }

    /// The groups, sorted by key.
    pub fn groups(&self) -> &Vector<Group<K, T>> {
        &self.groups
    }

    /// Obtain a new subscriber for the group list.
    ///
    /// Groups being created or removed are broadcast as
    /// [`VectorDiff::Insert`][eyeball_im::VectorDiff::Insert] and
    /// [`VectorDiff::Remove`][eyeball_im::VectorDiff::Remove].
    pub fn subscribe(&self) -> VectorSubscriber<Group<K, T>> {
        self.groups.subscribe()
    }

    /// Get the group for the given key.
    pub fn group(&self, key: &K) -> Option<Group<K, T>> {
        self.lookup.get(key).map(|slot| slot.view(key.clone()))
    }

    /// The keys of all groups, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.groups.iter().map(Group::key)
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Check that groups are sorted and non-empty, that their elements are
    /// sorted, and that there is exactly one group per key, whose handle in the
    /// group list views the same element list as the lookup entry.
    pub fn check_invariants(&self) -> bool {
        let groups_sorted = self
            .groups
            .iter()
            .zip(self.groups.iter().skip(1))
            .all(|(left, right)| (self.key_order)(left.key(), right.key()).is_lt());

        let groups_consistent = self.lookup.len() == self.groups.len()
            && self.groups.iter().all(|group| {
                let Some(slot) = self.lookup.get(group.key()) else {
                    return false;
                };
                let elements = slot.elements();

                slot.is_viewed_by(group)
                    && !elements.is_empty()
                    && elements
                        .iter()
                        .zip(elements.iter().skip(1))
                        .all(|(left, right)| (self.element_order)(left, right).is_le())
            });

        groups_sorted && groups_consistent
    }

    fn group_position(&self, key: &K) -> Option<usize> {
        let key_order = &self.key_order;
        search::position(
            &self.groups,
            |group| key_order(group.key(), key),
            |group| group.key() == key,
        )
    }
}

impl<K, T> fmt::Debug for SortedGroups<K, T>
where
    K: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedGroups").field("groups", &*self.groups).finish_non_exhaustive()
    }
}
