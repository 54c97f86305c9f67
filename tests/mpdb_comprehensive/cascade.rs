//! Deleting a container removes everything below it.

use serde_json::json;

use crate::{doc, seeded_engine};

#[test]
fn delete_database_removes_collections_and_documents() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"v": 1})))
        .unwrap();
    engine.delete_database("shop").unwrap();

    assert!(engine.list_collections("shop").unwrap_err().is_not_found());
    assert!(engine.read_all_documents("shop", "items").unwrap_err().is_not_found());
    assert!(engine.read_document("shop", "items", "a").unwrap_err().is_not_found());
}

#[test]
fn recreated_database_starts_empty() {
    let engine = seeded_engine();
    engine.delete_database("shop").unwrap();
    engine.create_database("shop").unwrap();
    assert!(engine.list_collections("shop").unwrap().is_empty());
}

#[test]
fn delete_collection_keeps_siblings() {
    let engine = seeded_engine();
    engine.create_collection("shop", "orders").unwrap();
    engine
        .create_document("shop", "orders", Some("o"), doc(json!({})))
        .unwrap();
    engine.delete_collection("shop", "items").unwrap();

    assert_eq!(engine.list_collections("shop").unwrap(), vec!["orders"]);
    assert!(engine.read_document("shop", "orders", "o").is_ok());
    assert!(engine.read_all_documents("shop", "items").unwrap_err().is_not_found());
}

#[test]
fn delete_then_read_document_is_not_found() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"v": 1})))
        .unwrap();
    engine.delete_document("shop", "items", "a").unwrap();
    assert!(engine.read_document("shop", "items", "a").unwrap_err().is_not_found());
    assert!(engine.delete_document("shop", "items", "a").unwrap_err().is_not_found());
}

#[test]
fn deleting_missing_things_is_not_found() {
    let engine = seeded_engine();
    assert!(engine.delete_database("nope").unwrap_err().is_not_found());
    assert!(engine.delete_collection("shop", "nope").unwrap_err().is_not_found());
    assert!(engine.delete_collection("nope", "items").unwrap_err().is_not_found());
}
