use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use eyeball_im_group::{
    order::natural_order, Insertion, ObservableSource, Removal, SortedGroups, SourceChange,
    Subscription, SyncReport, Vector,
};

use super::{by_first_letter, first_letter, names, snapshot};

type Changes = Arc<Mutex<Vec<SourceChange<&'static str>>>>;

fn record(source: &ObservableSource<&'static str>) -> (Subscription<&'static str>, Changes) {
    let changes = Changes::default();
    let subscription = source.observe({
        let changes = Arc::clone(&changes);
        move |change, _values| changes.lock().unwrap().push(change.clone())
    });
    (subscription, changes)
}

fn vector(values: &[&'static str]) -> Vector<&'static str> {
    values.iter().copied().collect()
}

#[test]
fn changes_carry_elements() {
    let mut source = names();
    let (_subscription, changes) = record(&source);

    source.push_back("Kim");
    source.insert(1, "Ida");
    source.set(0, "Odin");
    source.remove(1);
    source.truncate(5);
    source.move_item(0, 4);
    source.clear();

    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 7);
    assert_eq!(changes[0], SourceChange::Add { index: 6, values: vector(&["Kim"]) });
    assert_eq!(changes[1], SourceChange::Add { index: 1, values: vector(&["Ida"]) });
    assert_eq!(
        changes[2],
        SourceChange::Replace { index: 0, removed: vector(&["Hans"]), added: vector(&["Odin"]) }
    );
    assert_eq!(changes[3], SourceChange::Remove { index: 1, values: vector(&["Ida"]) });
    assert_eq!(
        changes[4],
        SourceChange::Remove { index: 5, values: vector(&["Achim", "Kim"]) }
    );
    assert_eq!(changes[5], SourceChange::Move { from: 0, to: 4 });
    assert_eq!(changes[6], SourceChange::Reset);
}

#[test]
fn no_op_mutations_are_silent() {
    let mut source = ObservableSource::<&'static str>::new();
    let (_subscription, changes) = record(&source);

    assert_eq!(source.pop_front(), None);
    assert_eq!(source.pop_back(), None);
    source.clear();
    source.append(Vector::new());
    source.truncate(3);

    source.push_back("Kim");
    source.move_item(0, 0);

    assert_eq!(changes.lock().unwrap().len(), 1);
}

#[test]
#[should_panic = "index out of bounds: the length is 6 but the index is 7"]
fn insert_out_of_bounds() {
    let mut source = names();
    source.insert(7, "Kim");
}

#[test]
#[should_panic]
fn move_out_of_bounds() {
    let mut source = names();
    source.move_item(1, 6);
}

#[test]
fn observer_sees_state_after_change() {
    let mut source = names();
    let lengths = Arc::new(Mutex::new(Vec::new()));
    let _subscription = source.observe({
        let lengths = Arc::clone(&lengths);
        move |_change, values| lengths.lock().unwrap().push(values.len())
    });

    source.push_back("Kim");
    source.pop_front();
    source.reset(Vector::new());

    assert_eq!(*lengths.lock().unwrap(), [7, 6, 0]);
}

#[test]
fn detach_stops_following() {
    let mut source = names();
    let mut index = by_first_letter(&source);
    assert_eq!(source.observer_count(), 1);
    assert!(index.is_attached());

    index.detach();
    assert_eq!(source.observer_count(), 0);
    assert!(!index.is_attached());

    let before = snapshot(&index);
    source.push_back("Kim");
    source.clear();
    assert_eq!(snapshot(&index), before);

    // Detaching twice is fine.
    index.detach();
}

#[test]
fn dropping_index_detaches() {
    let source = names();
    let index = by_first_letter(&source);
    let other = by_first_letter(&source);
    assert_eq!(source.observer_count(), 2);

    drop(index);
    assert_eq!(source.observer_count(), 1);
    assert!(other.is_attached());
}

#[test]
fn dropping_source_leaves_index_readable() {
    let source = names();
    let index = by_first_letter(&source);

    drop(source);
    assert!(!index.is_attached());
    assert_eq!(index.keys(), ['A', 'H', 'M']);
}

#[test]
fn subscription_detach() {
    let source = names();
    let subscription = source.observe(|_, _| {});
    assert!(subscription.is_attached());
    assert_eq!(source.observer_count(), 1);

    subscription.detach();
    assert_eq!(source.observer_count(), 0);
}

#[test]
fn untracked_removals_are_ignored() {
    let mut groups = SortedGroups::new(first_letter, natural_order, natural_order);
    groups.reset(&vector(&["Hans", "Mark"]));

    assert_eq!(groups.remove_element(&"Zora"), Removal::UntrackedKey);
    assert_eq!(groups.remove_element(&"Hugo"), Removal::UntrackedElement);
    assert!(Removal::UntrackedKey.is_untracked());
    assert_eq!(groups.keys().copied().collect::<Vec<_>>(), ['H', 'M']);

    let report = groups.apply(
        &SourceChange::Remove { index: 0, values: vector(&["Hugo", "Hans", "Hans"]) },
        &vector(&["Mark"]),
    );
    assert_eq!(
        report,
        SyncReport { removed: 1, untracked: 2, groups_removed: 1, ..Default::default() }
    );
    assert!(groups.check_invariants());
}

#[test]
fn drive_sorted_groups_directly() {
    let mut groups = SortedGroups::new(first_letter, natural_order, natural_order);
    assert!(groups.is_empty());

    assert_eq!(groups.add_element("Mark"), Insertion::CreatedGroup);
    assert_eq!(groups.add_element("Martin"), Insertion::Inserted);
    assert_eq!(groups.add_element("Achim"), Insertion::CreatedGroup);

    assert_eq!(groups.len(), 2);
    assert_matches!(groups.group(&'M'), Some(group) if group.len() == 2);
    assert_matches!(groups.group(&'X'), None);

    assert_eq!(groups.remove_element(&"Mark"), Removal::Removed);
    assert_eq!(groups.remove_element(&"Martin"), Removal::RemovedGroup);
    assert_eq!(groups.keys().copied().collect::<Vec<_>>(), ['A']);
}

#[test]
fn replace_with_several_elements() {
    let mut groups = SortedGroups::new(first_letter, natural_order, natural_order);
    groups.reset(&vector(&["Achim", "Hans", "Mark"]));
    let old_h = groups.group(&'H').unwrap();

    let report = groups.apply(
        &SourceChange::Replace {
            index: 1,
            removed: vector(&["Hans", "Mark"]),
            added: vector(&["Hugo", "Mia", "Zed", "Albert"]),
        },
        &vector(&["Achim", "Hugo", "Mia", "Zed", "Albert"]),
    );

    // Both old groups were emptied and removed before the new elements came in.
    assert_eq!(
        report,
        SyncReport { inserted: 4, removed: 2, untracked: 0, groups_created: 3, groups_removed: 2 }
    );
    assert!(old_h.is_empty());
    assert!(groups.check_invariants());

    let contents: Vec<_> = groups
        .groups()
        .iter()
        .map(|group| (*group.key(), group.elements().into_iter().collect::<Vec<_>>()))
        .collect();
    assert_eq!(
        contents,
        [
            ('A', vec!["Achim", "Albert"]),
            ('H', vec!["Hugo"]),
            ('M', vec!["Mia"]),
            ('Z', vec!["Zed"]),
        ]
    );
}
