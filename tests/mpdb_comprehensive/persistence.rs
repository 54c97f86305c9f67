//! Snapshot durability across engine restarts.

use std::fs;
use std::sync::Arc;

use mpdb::{Engine, Limits, MemoryPersistence, Persistence, Store};
use serde_json::json;
use tempfile::TempDir;

use crate::{doc, file_engine};

fn populate(engine: &Engine) {
    engine.create_database("shop").unwrap();
    engine.create_database("empty").unwrap();
    engine.create_collection("shop", "items").unwrap();
    engine.create_collection("shop", "nothing").unwrap();
    engine
        .create_document(
            "shop",
            "items",
            Some("mixed"),
            doc(json!({
                "int": 42,
                "float": 2.5,
                "neg": -7,
                "text": "héllo \"quoted\"",
                "flag": false,
                "none": null,
                "list": [1, "two", {"three": 3}],
                "nested": {"deep": {"deeper": [true]}}
            })),
        )
        .unwrap();
}

#[test]
fn restart_restores_identical_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("mpdb_data.json");

    let before = {
        let engine = file_engine(&path);
        populate(&engine);
        engine.snapshot()
    };

    let engine = file_engine(&path);
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.list_databases(), vec!["empty", "shop"]);
    assert_eq!(engine.list_collections("shop").unwrap(), vec!["items", "nothing"]);
}

#[test]
fn every_mutation_is_on_disk_immediately() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap.json");
    let engine = file_engine(&path);

    engine.create_database("shop").unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, json!({"shop": {}}));

    engine.create_collection("shop", "items").unwrap();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"v": 1})))
        .unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, json!({"shop": {"items": {"a": {"v": 1}}}}));

    engine.delete_database("shop").unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, json!({}));
}

#[test]
fn integers_stay_integers_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap.json");
    let engine = file_engine(&path);
    populate(&engine);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"int\": 42"));
    assert!(text.contains("\"float\": 2.5"));
}

#[test]
fn corrupt_snapshot_starts_empty_and_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap.json");
    fs::write(&path, "{\"shop\": {\"items\": ").unwrap();

    let engine = file_engine(&path);
    assert!(engine.list_databases().is_empty());

    engine.create_database("fresh").unwrap();
    let engine = file_engine(&path);
    assert_eq!(engine.list_databases(), vec!["fresh"]);
}

#[test]
fn snapshot_written_by_hand_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap.json");
    fs::write(
        &path,
        r#"{"library": {"books": {"b1": {"title": "Dune", "year": 1965}}}}"#,
    )
    .unwrap();

    let engine = file_engine(&path);
    assert_eq!(
        engine.read_document("library", "books", "b1").unwrap(),
        doc(json!({"title": "Dune", "year": 1965}))
    );
}

#[test]
fn reads_never_save() {
    let memory = Arc::new(MemoryPersistence::new());
    let engine = Engine::with_persistence(Box::new(memory.clone()), Limits::default());
    populate(&engine);
    let saves = memory.save_count();

    engine.list_databases();
    engine.read_database("shop").unwrap();
    engine.read_all_documents("shop", "items").unwrap();
    assert!(engine.read_document("shop", "items", "missing").is_err());
    assert_eq!(memory.save_count(), saves);
}

#[test]
fn memory_backend_survives_engine_restart() {
    let memory = Arc::new(MemoryPersistence::new());
    {
        let engine = Engine::with_persistence(Box::new(memory.clone()), Limits::default());
        populate(&engine);
    }
    let restored: Store = memory.load().unwrap();
    let engine = Engine::with_persistence(Box::new(memory), Limits::default());
    assert_eq!(engine.snapshot(), restored);
    assert_eq!(engine.list_databases(), vec!["empty", "shop"]);
}
