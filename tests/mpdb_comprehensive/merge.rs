//! Updates are shallow merges of top-level fields.

use mpdb::{Map, Value};
use proptest::prelude::*;
use serde_json::json;

use crate::{doc, seeded_engine};

fn patch(v: serde_json::Value) -> Map {
    doc(v).into_object().unwrap()
}

#[test]
fn untouched_fields_survive() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"a": 0, "b": 2})))
        .unwrap();
    let merged = engine
        .update_document("shop", "items", "a", patch(json!({"a": 1})))
        .unwrap();
    assert_eq!(merged, doc(json!({"a": 1, "b": 2})));
    assert_eq!(engine.read_document("shop", "items", "a").unwrap(), merged);
}

#[test]
fn nested_objects_are_replaced_not_merged() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"meta": {"x": 1, "y": 2}})))
        .unwrap();
    let merged = engine
        .update_document("shop", "items", "a", patch(json!({"meta": {"x": 9}})))
        .unwrap();
    assert_eq!(merged, doc(json!({"meta": {"x": 9}})));
}

#[test]
fn null_in_patch_is_stored_not_deleted() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"a": 1})))
        .unwrap();
    let merged = engine
        .update_document("shop", "items", "a", patch(json!({"a": null})))
        .unwrap();
    assert_eq!(merged.get("a"), Some(&Value::Null));
}

#[test]
fn empty_patch_is_a_no_op() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("a"), doc(json!({"a": 1})))
        .unwrap();
    let merged = engine
        .update_document("shop", "items", "a", Map::new())
        .unwrap();
    assert_eq!(merged, doc(json!({"a": 1})));
}

#[test]
fn update_missing_document_is_not_found() {
    let engine = seeded_engine();
    let err = engine
        .update_document("shop", "items", "ghost", patch(json!({"a": 1})))
        .unwrap_err();
    assert!(err.is_not_found());
}

proptest! {
    #[test]
    fn prop_merge_keeps_unpatched_and_applies_patched(
        base in prop::collection::btree_map("[a-e]", 0i64..100, 0..5),
        update in prop::collection::btree_map("[c-h]", 0i64..100, 0..5),
    ) {
        let engine = seeded_engine();
        let body: Map = base.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        let changes: Map = update.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        engine.create_document("shop", "items", Some("p"), Value::Object(body)).unwrap();

        let merged = engine.update_document("shop", "items", "p", changes).unwrap();
        for (k, v) in &base {
            if !update.contains_key(k) {
                prop_assert_eq!(merged.get(k), Some(&Value::from(*v)));
            }
        }
        for (k, v) in &update {
            prop_assert_eq!(merged.get(k), Some(&Value::from(*v)));
        }
        prop_assert_eq!(
            merged.as_object().unwrap().len(),
            base.keys().chain(update.keys()).collect::<std::collections::BTreeSet<_>>().len()
        );
    }
}
