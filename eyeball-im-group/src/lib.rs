//! Live, grouped and sorted projections of observable collections.
//!
//! An [`ObservableSource`] is a mutable ordered list that tells its observers
//! about every change made to it. A [`GroupIndex`] attached to such a source
//! partitions its elements into [`Group`]s by a key function, keeps the groups
//! sorted by key and keeps the elements of each group sorted by an element
//! order. Every change to the source is applied to the projection in place,
//! before the mutating call on the source returns.
//!
//! The group list and each group's element list are
//! [`ObservableVector`][eyeball_im::ObservableVector]s, so consumers can
//! subscribe to either and receive [`VectorDiff`]s as groups and elements come
//! and go.
//!
//! ```
//! use eyeball_im_group::{ObservableSource, SourceExt};
//!
//! let mut names: ObservableSource<String> =
//!     ["Hans", "Mark", "Albert"].into_iter().map(str::to_owned).collect();
//! let index = names.group_by_ord(|name: &String| name.chars().next());
//!
//! names.push_back("Achim".to_owned());
//!
//! let groups = index.groups();
//! assert_eq!(groups.len(), 3);
//! assert_eq!(groups[0].key(), &Some('A'));
//! assert_eq!(groups[0].elements().into_iter().collect::<Vec<_>>(), ["Achim", "Albert"]);
//! ```
//!
//! Cargo features:
//!
//! - `tracing`: Emit [tracing] events when the source or a projection is
//!   updated

mod ext;
mod group;
mod index;
pub mod order;
mod search;
mod source;

pub use self::{
    ext::SourceExt,
    group::Group,
    index::{GroupIndex, GroupingConfig, Insertion, Removal, SortedGroups, SyncReport},
    source::{ObservableSource, SourceChange, Subscription},
};

#[doc(no_inline)]
pub use eyeball_im::{Vector, VectorDiff, VectorSubscriber};
