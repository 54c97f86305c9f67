//! Filter semantics over full collection scans.

use mpdb::{Engine, Filter, QueryOptions};
use serde_json::json;

use crate::{doc, insert_values, seeded_engine};

fn matching_ids(engine: &Engine, filter: serde_json::Value) -> Vec<String> {
    let filter = Filter::parse(doc(filter).as_object().unwrap());
    let mut ids: Vec<String> = engine
        .query("shop", "items", &filter, &QueryOptions::default())
        .unwrap()
        .documents
        .into_iter()
        .map(|d| d.id)
        .collect();
    ids.sort();
    ids
}

fn people() -> std::sync::Arc<Engine> {
    let engine = seeded_engine();
    let rows = [
        ("alice", json!({"name": "Alice", "age": 31, "city": "Oslo", "tags": ["admin"], "address": {"zip": "0150"}})),
        ("bob", json!({"name": "Bob", "age": 25, "city": "Bergen", "address": {"zip": "5003"}})),
        ("carol", json!({"name": "Carol", "age": 40, "city": "Oslo", "nickname": null})),
        ("dave", json!({"name": "dave", "age": "unknown"})),
    ];
    for (id, body) in rows {
        engine
            .create_document("shop", "items", Some(id), doc(body))
            .unwrap();
    }
    engine
}

#[test]
fn comparison_operators() {
    let engine = seeded_engine();
    insert_values(&engine, &[10, 20, 30]);
    assert_eq!(matching_ids(&engine, json!({"v": {"$gt": 15}})), vec!["d20", "d30"]);
    assert_eq!(matching_ids(&engine, json!({"v": {"$gte": 20, "$lte": 20}})), vec!["d20"]);
    assert_eq!(matching_ids(&engine, json!({"v": {"$lt": 20}})), vec!["d10"]);
    assert_eq!(matching_ids(&engine, json!({"v": {"$ne": 20}})), vec!["d10", "d30"]);
}

#[test]
fn empty_filter_matches_everything() {
    let engine = people();
    assert_eq!(matching_ids(&engine, json!({})).len(), 4);
}

#[test]
fn literal_equality_and_numeric_tolerance() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("f"), doc(json!({"v": 0.1 + 0.2})))
        .unwrap();
    assert_eq!(matching_ids(&engine, json!({"v": 0.3})), vec!["f"]);
    assert_eq!(matching_ids(&engine, json!({"v": {"$eq": 0.3}})), vec!["f"]);
}

#[test]
fn string_equality() {
    let engine = people();
    assert_eq!(matching_ids(&engine, json!({"city": "Oslo"})), vec!["alice", "carol"]);
    assert_eq!(matching_ids(&engine, json!({"age": "unknown"})), vec!["dave"]);
}

#[test]
fn in_and_nin() {
    let engine = people();
    assert_eq!(
        matching_ids(&engine, json!({"city": {"$in": ["Bergen", "Trondheim"]}})),
        vec!["bob"]
    );
    assert_eq!(
        matching_ids(&engine, json!({"city": {"$nin": ["Oslo"]}})),
        vec!["bob"]
    );
    // Non-array argument never matches
    assert!(matching_ids(&engine, json!({"city": {"$in": "Oslo"}})).is_empty());
}

#[test]
fn exists() {
    let engine = people();
    assert_eq!(matching_ids(&engine, json!({"tags": {"$exists": true}})), vec!["alice"]);
    assert_eq!(
        matching_ids(&engine, json!({"nickname": {"$exists": true}})),
        vec!["carol"]
    );
    assert_eq!(
        matching_ids(&engine, json!({"tags": {"$exists": false}})),
        vec!["bob", "carol", "dave"]
    );
}

#[test]
fn missing_field_fails_comparisons() {
    let engine = people();
    assert!(matching_ids(&engine, json!({"height": {"$gt": 0}})).is_empty());
    assert!(matching_ids(&engine, json!({"height": 180})).is_empty());
}

#[test]
fn regex_is_anchored() {
    let engine = people();
    assert_eq!(matching_ids(&engine, json!({"name": {"$regex": "[A-C].*"}})), vec!["alice", "bob", "carol"]);
    assert!(matching_ids(&engine, json!({"name": {"$regex": "li"}})).is_empty());
    assert_eq!(matching_ids(&engine, json!({"name": {"$regex": ".*li.*"}})), vec!["alice"]);
    // Invalid pattern matches nothing
    assert!(matching_ids(&engine, json!({"name": {"$regex": "("}})).is_empty());
}

#[test]
fn logical_operators() {
    let engine = people();
    assert_eq!(
        matching_ids(&engine, json!({"$or": [{"city": "Bergen"}, {"age": {"$gt": 35}}]})),
        vec!["bob", "carol"]
    );
    assert_eq!(
        matching_ids(&engine, json!({"$and": [{"city": "Oslo"}, {"age": {"$lt": 35}}]})),
        vec!["alice"]
    );
    assert_eq!(
        matching_ids(&engine, json!({"$not": {"city": "Oslo"}})),
        vec!["bob", "dave"]
    );
    assert!(matching_ids(&engine, json!({"$or": []})).is_empty());
}

#[test]
fn dotted_paths_descend_into_objects() {
    let engine = people();
    assert_eq!(matching_ids(&engine, json!({"address.zip": "5003"})), vec!["bob"]);
    assert_eq!(
        matching_ids(&engine, json!({"address.zip": {"$regex": "0.*"}})),
        vec!["alice"]
    );
    assert!(matching_ids(&engine, json!({"city.zip": "0150"})).is_empty());
}

#[test]
fn unknown_operators_are_ignored() {
    let engine = people();
    assert_eq!(
        matching_ids(&engine, json!({"city": {"$near": 5, "$eq": "Bergen"}})),
        vec!["bob"]
    );
}

#[test]
fn query_reads_do_not_modify_store() {
    let engine = people();
    let before = engine.snapshot();
    matching_ids(&engine, json!({"age": {"$gt": 0}}));
    assert_eq!(engine.snapshot(), before);
}
