//! Integration tests for TodoStore persisted through SQLite.
//!
//! These tests reopen the store from disk to verify the round trip a fresh
//! process would see.

use std::sync::Arc;

use daybook_core::{StorageConfig, TodoFlavor};
use daybook_services::{KeyValueStore, SqliteKvStore, TodoStatus, TodoStore};

fn open_store(path: &std::path::Path, flavor: TodoFlavor) -> TodoStore {
    let kv = SqliteKvStore::open(path).unwrap();
    TodoStore::open(Arc::new(kv), "todos", flavor)
}

#[test]
fn test_add_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("daybook.db");

    {
        let mut store = open_store(&db, TodoFlavor::Web);
        store.add("Buy milk");
    }

    let store = open_store(&db, TodoFlavor::Web);
    assert_eq!(store.len(), 1);
    assert_eq!(store.todos()[0].text, "Buy milk");
    assert_eq!(store.todos()[0].status, TodoStatus::Pending);
}

#[test]
fn test_order_is_stable_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("daybook.db");

    let expected: Vec<String> = {
        let mut store = open_store(&db, TodoFlavor::Mobile);
        for text in ["one", "two", "three"] {
            store.add(text);
        }
        let first = store.todos()[1].id.clone();
        store.toggle(&first);
        store.todos().iter().map(|t| t.id.clone()).collect()
    };

    let store = open_store(&db, TodoFlavor::Mobile);
    let ids: Vec<String> = store.todos().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, expected);
    assert_eq!(store.todos()[0].text, "three");
    assert!(store.todos()[1].is_completed());
}

#[test]
fn test_mobile_data_opens_in_web_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("daybook.db");

    {
        let mut store = open_store(&db, TodoFlavor::Mobile);
        let id = store.add("Walk dog").unwrap().id.clone();
        store.toggle(&id);
    }

    let mut store = open_store(&db, TodoFlavor::Web);
    assert_eq!(store.grouped_view().completed.len(), 1);

    // Writing back switches the persisted shape to the web convention.
    store.add("Feed cat");
    let kv = SqliteKvStore::open(&db).unwrap();
    let blob = kv.get("todos").unwrap().unwrap();
    assert!(blob.contains(r#""status":"completed""#));
    assert!(!blob.contains("\"completed\":true"));
}

#[test]
fn test_from_config_uses_key_and_flavor() {
    let kv = Arc::new(SqliteKvStore::in_memory().unwrap());
    let config = StorageConfig {
        database_path: ":memory:".into(),
        todo_key: "dashboard.todos".to_string(),
        flavor: TodoFlavor::Mobile,
    };

    let mut store = TodoStore::from_config(kv.clone(), &config);
    store.add("x");

    assert_eq!(store.flavor(), TodoFlavor::Mobile);
    assert!(kv.get("dashboard.todos").unwrap().is_some());
    assert!(kv.get("todos").unwrap().is_none());
}

#[test]
fn test_corrupt_blob_recovers_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("daybook.db");
    SqliteKvStore::open(&db)
        .unwrap()
        .set("todos", "[{\"id\":")
        .unwrap();

    let mut store = open_store(&db, TodoFlavor::Web);
    assert!(store.is_empty());

    // The next mutation overwrites the corrupt value.
    store.add("fresh start");
    let store = open_store(&db, TodoFlavor::Web);
    assert_eq!(store.len(), 1);
}
