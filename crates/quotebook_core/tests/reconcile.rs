use quotebook_core::{reconcile, Quote};

#[test]
fn matching_entry_is_updated_and_new_entry_appended() {
    let local = vec![Quote::unchecked("Work hard", "Motivation")];
    let remote = vec![
        Quote::unchecked("Work hard", "Motivation"),
        Quote::unchecked("New", "Server"),
    ];

    let outcome = reconcile(local, &remote);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.merged, remote);
}

#[test]
fn existing_order_is_preserved_and_new_entries_go_last() {
    let local = vec![
        Quote::unchecked("one", "A"),
        Quote::unchecked("two", "B"),
        Quote::unchecked("three", "C"),
    ];
    let remote = vec![Quote::unchecked("fresh", "Server"), Quote::unchecked("two", "B")];

    let outcome = reconcile(local, &remote);
    let texts: Vec<&str> = outcome.merged.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three", "fresh"]);
    assert_eq!((outcome.added, outcome.updated), (1, 1));
}

#[test]
fn same_text_different_category_is_a_new_entry() {
    let local = vec![Quote::unchecked("Work hard", "Motivation")];
    let outcome = reconcile(local, &[Quote::unchecked("Work hard", "Server")]);
    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.merged.len(), 2);
}

#[test]
fn second_pass_with_same_remote_only_updates() {
    let local = vec![Quote::unchecked("mine", "Local")];
    let remote = vec![
        Quote::unchecked("s1", "Server"),
        Quote::unchecked("s2", "Server"),
        Quote::unchecked("mine", "Local"),
    ];

    let first = reconcile(local, &remote);
    assert_eq!((first.added, first.updated), (2, 1));

    let second = reconcile(first.merged.clone(), &remote);
    assert_eq!(second.added, 0);
    assert_eq!(second.updated, remote.len());
    assert_eq!(second.merged, first.merged);
}
