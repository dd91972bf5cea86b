mod common;

use common::{empty_store, flaky_store_with, memory_repo, store_with};
use quotebook_core::repo::quote_repo::{FILTER_KEY, LEGACY_FILTER_KEY, QUOTES_KEY};
use quotebook_core::{
    default_quotes, CategoryFilter, ImportError, KeyValueStore, KvQuoteRepository,
    MemoryKeyValueStore, Quote, QuoteRepository, QuoteStore, SqliteKeyValueStore, StoreError,
};
use serde_json::json;
use std::sync::Arc;

#[test]
fn first_run_seeds_and_persists_defaults() {
    let durable = Arc::new(MemoryKeyValueStore::new());
    let repo = KvQuoteRepository::new(durable.clone(), Arc::new(MemoryKeyValueStore::new()));

    let store = QuoteStore::initialize(repo.clone()).unwrap();
    assert_eq!(store.quotes(), default_quotes().as_slice());
    assert_eq!(repo.load_collection(), Some(default_quotes()));
    assert_eq!(store.filter(), &CategoryFilter::All);
    assert_eq!(store.filtered().len(), 5);
}

#[test]
fn corrupt_stored_collection_reseeds() {
    let durable = Arc::new(MemoryKeyValueStore::new());
    durable.set(QUOTES_KEY, "[{\"text\": ").unwrap();
    let repo = KvQuoteRepository::new(durable, Arc::new(MemoryKeyValueStore::new()));

    let store = QuoteStore::initialize(repo).unwrap();
    assert_eq!(store.len(), 5);
}

#[test]
fn add_appends_persists_and_is_filterable() {
    let repo = memory_repo();
    repo.save_collection(&[]).unwrap();
    let mut store = QuoteStore::initialize(repo.clone()).unwrap();

    let created = store.add("  Keep going ", " Grit ").unwrap();
    assert_eq!(created, Quote::unchecked("Keep going", "Grit"));
    assert_eq!(store.len(), 1);
    assert_eq!(repo.load_collection(), Some(vec![created.clone()]));
    assert_eq!(store.list_categories(), vec!["Grit".to_string()]);
    assert_eq!(store.set_filter("Grit").unwrap(), &[created]);
}

#[test]
fn add_with_blank_field_is_rejected_without_change() {
    let mut store = store_with(&[Quote::unchecked("a", "b")]);

    for (text, category) in [("", "Life"), ("   ", "Life"), ("text", ""), ("text", "\t ")] {
        let err = store.add(text, category).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(err.is_validation());
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn add_updates_view_only_when_filter_matches() {
    let mut store = store_with(&[Quote::unchecked("a", "Life")]);
    store.set_filter("Life").unwrap();

    store.add("other", "Work").unwrap();
    assert_eq!(store.filtered().len(), 1);

    let matching = store.add("more", "Life").unwrap();
    assert_eq!(store.filtered().len(), 2);
    assert_eq!(store.last_viewed(), Some(matching));
}

#[test]
fn all_filter_view_matches_collection_size() {
    let mut store = empty_store();
    store.add("a", "One").unwrap();
    store.add("b", "Two").unwrap();
    store.set_filter("One").unwrap();
    store
        .import_quotes(&json!([{"text": "c", "category": "Three"}]))
        .unwrap();

    let view = store.set_filter("all").unwrap().len();
    assert_eq!(view, store.len());
}

#[test]
fn exact_filter_is_case_sensitive_and_may_be_empty() {
    let mut store = store_with(&[
        Quote::unchecked("a", "Life"),
        Quote::unchecked("b", "life"),
        Quote::unchecked("c", "Life"),
    ]);

    let view = store.set_filter("Life").unwrap().to_vec();
    assert_eq!(view.len(), 2);
    assert!(view.iter().all(|quote| quote.category == "Life"));

    assert!(store.set_filter("Missing").unwrap().is_empty());
}

#[test]
fn categories_are_distinct_in_first_seen_order() {
    let store = store_with(&default_quotes());
    assert_eq!(
        store.list_categories(),
        vec!["Motivation", "Business", "Life", "Inspiration"]
    );
}

#[test]
fn import_keeps_only_structurally_valid_entries() {
    let mut store = empty_store();
    let accepted = store
        .import_quotes(&json!([
            {"text": "A", "category": "B"},
            {"bad": 1},
            "not-an-object"
        ]))
        .unwrap();

    assert_eq!(accepted, 1);
    assert_eq!(store.quotes(), &[Quote::unchecked("A", "B")]);
}

#[test]
fn import_rejects_non_arrays_and_empty_results() {
    let mut store = store_with(&[Quote::unchecked("a", "b")]);

    let err = store.import_quotes(&json!({"text": "A", "category": "B"})).unwrap_err();
    assert!(matches!(err, StoreError::InvalidImport(ImportError::NotAnArray)));

    let err = store.import_quotes(&json!([{"text": 1}])).unwrap_err();
    assert!(matches!(err, StoreError::InvalidImport(ImportError::NoValidQuotes)));

    let err = store.import_json("[not json").unwrap_err();
    assert!(matches!(err, StoreError::InvalidImport(ImportError::MalformedJson(_))));

    assert_eq!(store.len(), 1);
}

#[test]
fn export_then_import_reproduces_collection() {
    let source = store_with(&[
        Quote::unchecked("First", "One"),
        Quote::unchecked("Second", "Two"),
        Quote::unchecked("Third", "One"),
    ]);
    let snapshot = source.export_snapshot().unwrap();
    assert!(snapshot.contains('\n'), "snapshot should be pretty-printed");

    let mut target = empty_store();
    let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    target.import_quotes(&parsed).unwrap();

    assert_eq!(target.quotes(), source.quotes());
}

#[test]
fn filter_selection_survives_reload_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("quotes.sqlite3");

    {
        let durable = Arc::new(SqliteKeyValueStore::open(&db_path).unwrap());
        let repo = KvQuoteRepository::new(durable, Arc::new(MemoryKeyValueStore::new()));
        let mut store = QuoteStore::initialize(repo).unwrap();
        store.add("Ship it", "Work").unwrap();
        store.set_filter("Work").unwrap();
    }

    let durable = Arc::new(SqliteKeyValueStore::open(&db_path).unwrap());
    assert_eq!(durable.get(FILTER_KEY).unwrap().as_deref(), Some("Work"));
    assert_eq!(durable.get(LEGACY_FILTER_KEY).unwrap().as_deref(), Some("Work"));

    let repo = KvQuoteRepository::new(durable, Arc::new(MemoryKeyValueStore::new()));
    let store = QuoteStore::initialize(repo).unwrap();
    assert_eq!(store.len(), 6);
    assert_eq!(store.filter(), &CategoryFilter::Category("Work".to_string()));
    assert_eq!(store.filtered(), &[Quote::unchecked("Ship it", "Work")]);
    assert_eq!(store.last_viewed(), None);
}

#[test]
fn show_quote_restores_without_rerandomizing() {
    let store = store_with(&default_quotes());
    let shown = default_quotes()[2].clone();
    store.show_quote(&shown).unwrap();
    assert_eq!(store.last_viewed(), Some(shown));
}

#[test]
fn failed_filter_save_keeps_previous_selection() {
    let (mut store, durable) = flaky_store_with(&[
        Quote::unchecked("a", "Life"),
        Quote::unchecked("b", "Work"),
    ]);
    durable.fail_writes(true);

    let err = store.set_filter("Life").unwrap_err();
    assert!(matches!(err, StoreError::Repo(_)));
    assert!(!err.is_validation());
    assert_eq!(store.filter(), &CategoryFilter::All);
    assert_eq!(store.filtered().len(), 2);
    assert_eq!(durable.get(FILTER_KEY).unwrap(), None);

    durable.fail_writes(false);
    assert_eq!(store.set_filter("Life").unwrap().len(), 1);
}

#[test]
fn failed_add_rolls_back_collection_and_view() {
    let seed = vec![Quote::unchecked("a", "Life")];
    let (mut store, durable) = flaky_store_with(&seed);
    durable.fail_writes(true);

    assert!(matches!(
        store.add("b", "Life").unwrap_err(),
        StoreError::Repo(_)
    ));
    assert_eq!(store.quotes(), seed.as_slice());
    assert_eq!(store.filtered(), seed.as_slice());
    assert_eq!(store.last_viewed(), None);
}

#[test]
fn failed_import_rolls_back_every_entry() {
    let seed = vec![Quote::unchecked("a", "Life")];
    let (mut store, durable) = flaky_store_with(&seed);
    durable.fail_writes(true);

    let err = store
        .import_quotes(&json!([
            {"text": "b", "category": "Work"},
            {"text": "c", "category": "Work"}
        ]))
        .unwrap_err();
    assert!(matches!(err, StoreError::Repo(_)));
    assert_eq!(store.quotes(), seed.as_slice());
    assert_eq!(store.list_categories(), vec!["Life".to_string()]);

    let stored = durable.get(QUOTES_KEY).unwrap().unwrap();
    let stored: Vec<Quote> = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored, seed);
}
