use eyeball_im_group::SyncReport;

use super::{by_first_letter, names, position_of, snapshot};

#[test]
fn initial_grouping() {
    let source = names();
    let index = by_first_letter(&source);

    assert_eq!(index.len(), 3);
    assert_eq!(
        snapshot(&index),
        vec![
            ('A', vec!["Achim", "Albert"]),
            ('H', vec!["Hans"]),
            ('M', vec!["Mark", "Martin", "Michael"]),
        ]
    );
    assert_eq!(
        index.last_report(),
        SyncReport { inserted: 6, groups_created: 3, ..Default::default() }
    );
    assert!(index.read(|groups| groups.check_invariants()));
}

#[test]
fn add_without_new_group() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.push_back("Holgar");

    assert_eq!(
        snapshot(&index),
        vec![
            ('A', vec!["Achim", "Albert"]),
            ('H', vec!["Hans", "Holgar"]),
            ('M', vec!["Mark", "Martin", "Michael"]),
        ]
    );
    assert_eq!(index.last_report(), SyncReport { inserted: 1, ..Default::default() });
}

#[test]
fn add_with_new_group() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.push_back("Kim");

    assert_eq!(index.len(), 4);
    assert_eq!(
        snapshot(&index),
        vec![
            ('A', vec!["Achim", "Albert"]),
            ('H', vec!["Hans"]),
            ('K', vec!["Kim"]),
            ('M', vec!["Mark", "Martin", "Michael"]),
        ]
    );
    assert_eq!(
        index.last_report(),
        SyncReport { inserted: 1, groups_created: 1, ..Default::default() }
    );
}

#[test]
fn remove_without_removing_group() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.remove(position_of(&source, "Martin"));

    assert_eq!(
        snapshot(&index),
        vec![('A', vec!["Achim", "Albert"]), ('H', vec!["Hans"]), ('M', vec!["Mark", "Michael"])]
    );
    assert_eq!(index.last_report(), SyncReport { removed: 1, ..Default::default() });
}

#[test]
fn remove_last_element_of_group() {
    let mut source = names();
    let index = by_first_letter(&source);
    let group_h = index.group(&'H').unwrap();

    source.remove(position_of(&source, "Hans"));

    assert_eq!(index.len(), 2);
    assert_eq!(
        snapshot(&index),
        vec![('A', vec!["Achim", "Albert"]), ('M', vec!["Mark", "Martin", "Michael"])]
    );
    assert!(index.group(&'H').is_none());
    assert_eq!(
        index.last_report(),
        SyncReport { removed: 1, groups_removed: 1, ..Default::default() }
    );

    // Handles to removed groups stay usable, they are just empty.
    assert_eq!(*group_h.key(), 'H');
    assert!(group_h.is_empty());
}

#[test]
fn replace_element() {
    let mut source = names();
    let index = by_first_letter(&source);

    let previous = source.set(0, "Odin");
    assert_eq!(previous, "Hans");

    assert_eq!(
        snapshot(&index),
        vec![
            ('A', vec!["Achim", "Albert"]),
            ('M', vec!["Mark", "Martin", "Michael"]),
            ('O', vec!["Odin"]),
        ]
    );
    assert_eq!(
        index.last_report(),
        SyncReport {
            inserted: 1,
            removed: 1,
            groups_created: 1,
            groups_removed: 1,
            ..Default::default()
        }
    );
}

#[test]
fn replace_within_group() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.set(position_of(&source, "Mark"), "Moritz");

    assert_eq!(
        snapshot(&index),
        vec![
            ('A', vec!["Achim", "Albert"]),
            ('H', vec!["Hans"]),
            ('M', vec!["Martin", "Michael", "Moritz"]),
        ]
    );
}

#[test]
fn clear() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.clear();

    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert!(index.keys().is_empty());
    assert_eq!(
        index.last_report(),
        SyncReport { removed: 6, groups_removed: 3, ..Default::default() }
    );
    assert!(index.read(|groups| groups.check_invariants()));
}

#[test]
fn move_is_ignored() {
    let mut source = names();
    let index = by_first_letter(&source);
    let before = snapshot(&index);

    source.move_item(2, 5);

    assert_eq!(
        source.iter().copied().collect::<Vec<_>>(),
        ["Hans", "Mark", "Michael", "Martin", "Achim", "Albert"]
    );
    assert_eq!(snapshot(&index), before);
    assert_eq!(index.last_report(), SyncReport::default());
    assert!(index.last_report().is_empty());
}

#[test]
fn reset_with_new_contents() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.reset(["Zora", "Bert", "Berta"].into_iter().collect());

    assert_eq!(snapshot(&index), vec![('B', vec!["Bert", "Berta"]), ('Z', vec!["Zora"])]);
    assert_eq!(
        index.last_report(),
        SyncReport {
            inserted: 3,
            removed: 6,
            groups_created: 2,
            groups_removed: 3,
            ..Default::default()
        }
    );
}

#[test]
fn batch_add_and_truncate() {
    let mut source = names();
    let index = by_first_letter(&source);

    source.append(["Kim", "Karl", "Anna"].into_iter().collect());
    assert_eq!(
        snapshot(&index),
        vec![
            ('A', vec!["Achim", "Albert", "Anna"]),
            ('H', vec!["Hans"]),
            ('K', vec!["Karl", "Kim"]),
            ('M', vec!["Mark", "Martin", "Michael"]),
        ]
    );

    // Drops Achim, Kim, Karl and Anna.
    source.truncate(5);
    assert_eq!(
        snapshot(&index),
        vec![('A', vec!["Albert"]), ('H', vec!["Hans"]), ('M', vec!["Mark", "Martin", "Michael"])]
    );
    assert_eq!(
        index.last_report(),
        SyncReport { removed: 4, groups_removed: 1, ..Default::default() }
    );
}
