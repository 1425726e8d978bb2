/// The outcome of adding one element to a [`SortedGroups`].
///
/// [`SortedGroups`]: crate::SortedGroups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The element was inserted into an existing group.
    Inserted,
    /// No group existed for the element's key, so one was created for it.
    CreatedGroup,
}

/// The outcome of removing one element from a [`SortedGroups`].
///
/// Removing an element that isn't part of the projection is not an error:
/// the structure is left untouched and one of the `Untracked` variants is
/// returned.
///
/// [`SortedGroups`]: crate::SortedGroups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The element was removed, its group still has other elements.
    Removed,
    /// The element was the last one of its group, so the group was removed
    /// too.
    RemovedGroup,
    /// There is no group for the element's key.
    UntrackedKey,
    /// The group for the element's key does not contain the element.
    UntrackedElement,
}

impl Removal {
    /// Whether this removal left the projection untouched.
    pub fn is_untracked(self) -> bool {
        matches!(self, Self::UntrackedKey | Self::UntrackedElement)
    }
}

/// A summary of what applying one source change did to a projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of elements inserted into groups.
    pub inserted: usize,
    /// Number of elements removed from groups.
    pub removed: usize,
    /// Number of removals that found nothing to remove.
    pub untracked: usize,
    /// Number of groups created.
    pub groups_created: usize,
    /// Number of groups removed.
    pub groups_removed: usize,
}

impl SyncReport {
    /// Whether the change left the projection untouched.
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.removed == 0
    }

    pub(crate) fn record_insertion(&mut self, insertion: Insertion) {
        self.inserted += 1;
        if insertion == Insertion::CreatedGroup {
            self.groups_created += 1;
        }
    }

    pub(crate) fn record_removal(&mut self, removal: Removal) {
        match removal {
            Removal::Removed => self.removed += 1,
            Removal::RemovedGroup => {
                self.removed += 1;
                self.groups_removed += 1;
            }
            Removal::UntrackedKey | Removal::UntrackedElement => self.untracked += 1,
        }
    }
}
