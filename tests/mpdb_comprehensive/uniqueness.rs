//! Duplicate names and ids are rejected with AlreadyExists.

use mpdb::{Engine, ErrorKind};
use serde_json::json;

use crate::{doc, seeded_engine};

#[test]
fn database_created_twice_fails() {
    let engine = Engine::cache();
    engine.create_database("shop").unwrap();
    let err = engine.create_database("shop").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(engine.list_databases(), vec!["shop"]);
}

#[test]
fn trimmed_names_collide() {
    let engine = Engine::cache();
    engine.create_database("shop").unwrap();
    assert!(engine.create_database("  shop ").unwrap_err().is_already_exists());
}

#[test]
fn collection_created_twice_fails() {
    let engine = seeded_engine();
    let err = engine.create_collection("shop", "items").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn same_collection_name_in_two_databases() {
    let engine = seeded_engine();
    engine.create_database("other").unwrap();
    engine.create_collection("other", "items").unwrap();
    assert_eq!(engine.list_collections("other").unwrap(), vec!["items"]);
}

#[test]
fn explicit_document_id_twice_fails_and_keeps_first() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("x"), doc(json!({"n": 1})))
        .unwrap();
    let err = engine
        .create_document("shop", "items", Some("x"), doc(json!({"n": 2})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(
        engine.read_document("shop", "items", "x").unwrap(),
        doc(json!({"n": 1}))
    );
}

#[test]
fn generated_ids_are_unique() {
    let engine = seeded_engine();
    let mut ids: Vec<String> = (0..500)
        .map(|_| engine.create_document("shop", "items", None, doc(json!({}))).unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 500);
}
