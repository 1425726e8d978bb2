use std::{
    fmt, ops,
    sync::{Arc, Mutex, Weak},
};

use eyeball_im::Vector;

type Observer<T> = Box<dyn FnMut(&SourceChange<T>, &Vector<T>) + Send>;

/// An ordered list of elements that synchronously notifies its observers of
/// every change made to it.
///
/// Unlike [`ObservableVector`][eyeball_im::ObservableVector], which buffers
/// updates for asynchronous subscribers, `ObservableSource` calls each
/// observer from within the mutating method, after the change has been
/// applied. By the time a method like [`push_back`][Self::push_back] returns,
/// every observer has seen the change.
pub struct ObservableSource<T> {
    values: Vector<T>,
    observers: Arc<Mutex<Observers<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ObservableSource<T> {
    /// Create a new, empty `ObservableSource`.
    pub fn new() -> Self {
        Self { values: Vector::new(), observers: Default::default() }
    }

    /// Turn the `ObservableSource` back into a regular `Vector`.
    ///
    /// All observers are detached.
    pub fn into_inner(self) -> Vector<T> {
        self.values
    }

    /// Attach an observer.
    ///
    /// The observer is called with every [`SourceChange`] and the contents of
    /// the source right after that change, until the returned [`Subscription`]
    /// is detached or dropped.
    ///
    /// Observers must not try to lock anything the code mutating the source
    /// holds, and must not detach subscriptions of the same source from
    /// within a notification.
    pub fn observe(
        &self,
        observer: impl FnMut(&SourceChange<T>, &Vector<T>) + Send + 'static,
    ) -> Subscription<T> {
        let mut observers = self.observers.lock().unwrap();
        let id = observers.next_id;
        observers.next_id += 1;
        observers.entries.push((id, Box::new(observer)));

        Subscription { id, observers: Arc::downgrade(&self.observers) }
    }

    /// The number of currently attached observers.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().entries.len()
    }

    /// Append the given elements at the end of the source and notify
    /// observers.
    pub fn append(&mut self, values: Vector<T>) {
        if values.is_empty() {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::source::update",
            "append(len = {})",
            values.len()
        );

        let index = self.values.len();
        self.values.append(values.clone());
        self.notify(SourceChange::Add { index, values });
    }

    /// Add an element at the front of the source and notify observers.
    pub fn push_front(&mut self, value: T) {
        self.insert(0, value);
    }

    /// Add an element at the back of the source and notify observers.
    pub fn push_back(&mut self, value: T) {
        self.insert(self.values.len(), value);
    }

    /// Insert an element at the given position and notify observers.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.values.len();
        if index <= len {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "eyeball_im_group::source::update", "insert(index = {index})");

            self.values.insert(index, value.clone());
            self.notify(SourceChange::Add { index, values: Vector::unit(value) });
        } else {
            panic!("index out of bounds: the length is {len} but the index is {index}");
        }
    }

    /// Remove the first element, notify observers and return the element.
    ///
    /// If there are no elements, observers will not be notified and this
    /// method will return `None`.
    pub fn pop_front(&mut self) -> Option<T> {
        (!self.values.is_empty()).then(|| self.remove(0))
    }

    /// Remove the last element, notify observers and return the element.
    ///
    /// If there are no elements, observers will not be notified and this
    /// method will return `None`.
    pub fn pop_back(&mut self) -> Option<T> {
        let len = self.values.len();
        (len > 0).then(|| self.remove(len - 1))
    }

    /// Remove the element at the given position, notify observers and return
    /// the element.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.values.len();
        if index < len {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "eyeball_im_group::source::update", "remove(index = {index})");

            let value = self.values.remove(index);
            self.notify(SourceChange::Remove { index, values: Vector::unit(value.clone()) });
            value
        } else {
            panic!("index out of bounds: the length is {len} but the index is {index}");
        }
    }

    /// Truncate the source to `len` elements and notify observers.
    ///
    /// Does nothing if `len` is greater or equal to the source's current
    /// length.
    pub fn truncate(&mut self, len: usize) {
        if len < self.values.len() {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "eyeball_im_group::source::update", "truncate(len = {len})");

            let values = self.values.split_off(len);
            self.notify(SourceChange::Remove { index: len, values });
        }
    }

    /// Replace the element at the given position, notify observers and return
    /// the previous element at that position.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: T) -> T {
        let len = self.values.len();
        if index < len {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "eyeball_im_group::source::update", "set(index = {index})");

            let old_value = self.values.set(index, value.clone());
            self.notify(SourceChange::Replace {
                index,
                removed: Vector::unit(old_value.clone()),
                added: Vector::unit(value),
            });
            old_value
        } else {
            panic!("index out of bounds: the length is {len} but the index is {index}");
        }
    }

    /// Move the element at position `from` to position `to` and notify
    /// observers.
    ///
    /// After the move, the element is found at index `to`. Moving an element
    /// onto its own position does nothing.
    ///
    /// # Panics
    ///
    /// Panics if `from >= len` or `to >= len`.
    #[track_caller]
    pub fn move_item(&mut self, from: usize, to: usize) {
        let len = self.values.len();
        if from >= len || to >= len {
            let index = from.max(to);
            panic!("index out of bounds: the length is {len} but the index is {index}");
        }
        if from == to {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::source::update",
            "move_item(from = {from}, to = {to})"
        );

        let value = self.values.remove(from);
        self.values.insert(to, value);
        self.notify(SourceChange::Move { from, to });
    }

    /// Clear out all of the elements in the source and notify observers.
    pub fn clear(&mut self) {
        let already_empty = self.values.is_empty();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::source::update",
            nop = already_empty.then_some(true),
            "clear"
        );

        if !already_empty {
            self.values.clear();
            self.notify(SourceChange::Reset);
        }
    }

    /// Replace all of the elements in the source and notify observers.
    pub fn reset(&mut self, values: Vector<T>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::source::update",
            "reset(len = {})",
            values.len()
        );

        self.values = values;
        self.notify(SourceChange::Reset);
    }

    fn notify(&self, change: SourceChange<T>) {
        let mut observers = self.observers.lock().unwrap();
        for (_, observer) in &mut observers.entries {
            observer(&change, &self.values);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "eyeball_im_group::source::notify",
            "Source change delivered to {} observers",
            observers.entries.len()
        );
    }
}

impl<T: Clone + Send + Sync + 'static> Default for ObservableSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObservableSource<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableSource").field("values", &self.values).finish_non_exhaustive()
    }
}

// Note: No DerefMut because all mutating must go through inherent methods that
// notify observers
impl<T> ops::Deref for ObservableSource<T> {
    type Target = Vector<T>;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl<T: Clone + Send + Sync + 'static> From<Vector<T>> for ObservableSource<T> {
    fn from(values: Vector<T>) -> Self {
        Self { values, observers: Default::default() }
    }
}

impl<T: Clone + Send + Sync + 'static> FromIterator<T> for ObservableSource<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vector<T>>())
    }
}

struct Observers<T> {
    next_id: u64,
    entries: Vec<(u64, Observer<T>)>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self { next_id: 0, entries: Vec::new() }
    }
}

/// A change to an [`ObservableSource`].
///
/// Unlike [`VectorDiff`][eyeball_im::VectorDiff], changes carry the elements
/// that were added or removed rather than just their positions, so observers
/// don't need to keep a copy of the source around to make sense of them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceChange<T> {
    /// Elements were inserted.
    Add {
        /// The index of the first new element.
        index: usize,
        /// The new elements, in source order.
        values: Vector<T>,
    },
    /// Elements were removed.
    Remove {
        /// The index the first removed element had.
        index: usize,
        /// The removed elements, in source order.
        values: Vector<T>,
    },
    /// Elements were replaced by others at the same position.
    Replace {
        /// The index of the first replaced element.
        index: usize,
        /// The previous elements.
        removed: Vector<T>,
        /// The elements that took their place.
        added: Vector<T>,
    },
    /// An element changed its position without changing its value.
    Move {
        /// The position the element had before.
        from: usize,
        /// The position the element has now.
        to: usize,
    },
    /// The contents of the source changed entirely and should be re-read.
    Reset,
}

/// A handle to an observer attached to an [`ObservableSource`].
///
/// The observer stays attached until [`detach`][Self::detach] is called or
/// the `Subscription` is dropped.
pub struct Subscription<T> {
    id: u64,
    observers: Weak<Mutex<Observers<T>>>,
}

impl<T> Subscription<T> {
    /// Detach the observer from its source.
    ///
    /// Equivalent to dropping the `Subscription`.
    pub fn detach(self) {}

    /// Whether the observer is still attached, i.e. the source is still alive.
    pub fn is_attached(&self) -> bool {
        self.observers.upgrade().map_or(false, |observers| {
            observers.lock().unwrap().entries.iter().any(|(id, _)| *id == self.id)
        })
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            if let Ok(mut observers) = observers.lock() {
                observers.entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
