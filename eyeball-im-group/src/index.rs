use std::{
    cmp::Ordering,
    fmt,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard},
};

use eyeball_im::{Vector, VectorSubscriber};

mod report;
mod sorted_groups;

pub use self::{
    report::{Insertion, Removal, SyncReport},
    sorted_groups::SortedGroups,
};
use crate::{order::natural_order, Group, ObservableSource, Subscription};

/// Buffer capacities of the observable lists making up a projection.
///
/// Up to `capacity` updates that have not been received by all subscribers of
/// a list yet are retained. Subscribers that fall further behind see a
/// [`VectorDiff::Reset`][eyeball_im::VectorDiff::Reset] as their next update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupingConfig {
    pub(crate) groups_capacity: usize,
    pub(crate) elements_capacity: usize,
}

impl GroupingConfig {
    /// Create the default configuration, with a capacity of 16 for both the
    /// group list and each element list.
    pub fn new() -> Self {
        Self { groups_capacity: 16, elements_capacity: 16 }
    }

    /// Set the buffer capacity of the group list.
    pub fn groups_capacity(mut self, capacity: usize) -> Self {
        self.groups_capacity = capacity;
        self
    }

    /// Set the buffer capacity of every group's element list.
    pub fn elements_capacity(mut self, capacity: usize) -> Self {
        self.elements_capacity = capacity;
        self
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A grouped, sorted projection that follows an [`ObservableSource`].
///
/// On creation, the index is filled from the current contents of the source.
/// From then on, every change to the source is applied to the index before
/// the mutating method of the source returns, until the index is
/// [detached][Self::detach] or dropped.
///
/// ```
/// use eyeball_im_group::{order::natural_order, GroupIndex, ObservableSource};
///
/// let mut numbers: ObservableSource<u32> = [12, 7, 31, 15].into_iter().collect();
/// let index = GroupIndex::new(&numbers, |n: &u32| n / 10, natural_order, natural_order);
/// assert_eq!(index.keys(), [0, 1, 3]);
///
/// numbers.push_back(25);
/// assert_eq!(index.keys(), [0, 1, 2, 3]);
///
/// // 7 was the only element with key 0.
/// numbers.remove(1);
/// assert_eq!(index.keys(), [1, 2, 3]);
/// ```
pub struct GroupIndex<K, T> {
    state: Arc<Mutex<BoundState<K, T>>>,
    subscription: Option<Subscription<T>>,
}

impl<K, T> GroupIndex<K, T>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a `GroupIndex` that follows `source`.
    ///
    /// `selector` derives the key of an element and must return the same key
    /// for an element every time it is called. Groups are sorted by
    /// `key_order`, elements of a group by `element_order`; both must be total
    /// orders. See the [`order`][crate::order] module for helpers to build
    /// them.
    pub fn new<S, KO, EO>(
        source: &ObservableSource<T>,
        selector: S,
        key_order: KO,
        element_order: EO,
    ) -> Self
    where
        S: Fn(&T) -> K + Send + Sync + 'static,
        KO: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
        EO: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::with_config(source, selector, key_order, element_order, GroupingConfig::default())
    }

    /// Create a `GroupIndex` that follows `source`, sorting keys and elements
    /// by their [`Ord`] implementations.
    pub fn with_natural_order<S>(source: &ObservableSource<T>, selector: S) -> Self
    where
        K: Ord,
        T: Ord,
        S: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(source, selector, natural_order, natural_order)
    }

    /// Create a `GroupIndex` that follows `source`, with the given
    /// configuration.
    ///
    /// # Panics
    ///
    /// Panics if one of the configured capacities is `0`.
    #[track_caller]
    pub fn with_config<S, KO, EO>(
        source: &ObservableSource<T>,
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
        let mut groups = SortedGroups::with_config(selector, key_order, element_order, config);
        let last_report = groups.reset(source);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::index::sync",
            groups = groups.len(),
            elements = last_report.inserted,
            "Initial synchronization"
        );

        let state = Arc::new(Mutex::new(BoundState { groups, last_report }));
        let subscription = source.observe({
            let state = Arc::clone(&state);
            move |change, values| {
                let mut state = state.lock().unwrap();
                let report = state.groups.apply(change, values);
                state.last_report = report;
            }
        });

        Self { state, subscription: Some(subscription) }
    }

    /// Get a clone of the current groups, sorted by key.
    pub fn groups(&self) -> Vector<Group<K, T>> {
        self.lock().groups.groups().clone()
    }

    /// Obtain a new subscriber for the group list.
    ///
    /// If the index is shared between threads, keep in mind that the groups
    /// may change between a call to [`groups`][Self::groups] and this one.
    pub fn subscribe(&self) -> VectorSubscriber<Group<K, T>> {
        self.lock().groups.subscribe()
    }

    /// Get the group for the given key.
    pub fn group(&self, key: &K) -> Option<Group<K, T>> {
        self.lock().groups.group(key)
    }

    /// Get the keys of all groups, in sorted order.
    pub fn keys(&self) -> Vec<K> {
        self.lock().groups.keys().cloned().collect()
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.lock().groups.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.lock().groups.is_empty()
    }

    /// What the last source change (or the initial synchronization) did to
    /// the index.
    pub fn last_report(&self) -> SyncReport {
        self.lock().last_report
    }

    /// Run the given closure with read access to the underlying
    /// [`SortedGroups`].
    ///
    /// The source can not notify the index while the closure runs.
    pub fn read<R>(&self, f: impl FnOnce(&SortedGroups<K, T>) -> R) -> R {
        f(&self.lock().groups)
    }

    /// Stop following the source.
    ///
    /// The groups stay available in the state they were in, but later
    /// changes to the source are not applied to them anymore. Dropping the
    /// index also detaches it.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "eyeball_im_group::index::sync", "Detaching from source");

            subscription.detach();
        }
    }

    /// Whether the index still follows its source.
    ///
    /// This is `false` after [`detach`][Self::detach], and after the source
    /// has been dropped.
    pub fn is_attached(&self) -> bool {
        self.subscription.as_ref().map_or(false, Subscription::is_attached)
    }

    fn lock(&self) -> MutexGuard<'_, BoundState<K, T>> {
        self.state.lock().unwrap()
    }
}

impl<K, T> fmt::Debug for GroupIndex<K, T>
where
    K: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("GroupIndex");
        match self.state.try_lock() {
            Ok(state) => s.field("groups", &state.groups),
            Err(_) => s.field("groups", &format_args!("<locked>")),
        };
        s.field("attached", &self.subscription.is_some()).finish()
    }
}

struct BoundState<K, T> {
    groups: SortedGroups<K, T>,
    last_report: SyncReport,
}
