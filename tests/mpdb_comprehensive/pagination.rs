//! Sorting, skip and limit applied after filtering.

use mpdb::{Filter, QueryOptions, QueryResult, Value};
use serde_json::json;

use crate::{doc, insert_values, seeded_engine};

fn values(result: &QueryResult) -> Vec<Value> {
    result
        .documents
        .iter()
        .map(|d| d.body.get("v").cloned().unwrap_or(Value::Null))
        .collect()
}

fn nums(ns: &[i64]) -> Vec<Value> {
    ns.iter().map(|n| Value::from(*n)).collect()
}

#[test]
fn descending_window() {
    let engine = seeded_engine();
    insert_values(&engine, &[3, 1, 5, 2, 4]);
    let options = QueryOptions::default()
        .with_sort("v", false)
        .with_skip(1)
        .with_limit(2);
    let result = engine
        .query("shop", "items", &Filter::match_all(), &options)
        .unwrap();
    assert_eq!(values(&result), nums(&[4, 3]));
    assert_eq!(result.count, 2);
    assert_eq!(result.total_matches, 5);
}

#[test]
fn ascending_sort_is_numeric() {
    let engine = seeded_engine();
    insert_values(&engine, &[100, 9, 20]);
    let result = engine
        .query(
            "shop",
            "items",
            &Filter::match_all(),
            &QueryOptions::default().with_sort("v", true),
        )
        .unwrap();
    assert_eq!(values(&result), nums(&[9, 20, 100]));
}

#[test]
fn unsorted_keeps_insertion_order() {
    let engine = seeded_engine();
    insert_values(&engine, &[3, 1, 2]);
    let result = engine
        .query("shop", "items", &Filter::match_all(), &QueryOptions::default())
        .unwrap();
    assert_eq!(values(&result), nums(&[3, 1, 2]));
}

#[test]
fn total_matches_counts_before_window() {
    let engine = seeded_engine();
    insert_values(&engine, &[1, 2, 3, 4, 5, 6]);
    let filter = Filter::parse(doc(json!({"v": {"$gt": 2}})).as_object().unwrap());
    let result = engine
        .query(
            "shop",
            "items",
            &filter,
            &QueryOptions::default().with_sort("v", true).with_limit(1),
        )
        .unwrap();
    assert_eq!(values(&result), nums(&[3]));
    assert_eq!(result.total_matches, 4);
}

#[test]
fn skip_beyond_matches_is_empty() {
    let engine = seeded_engine();
    insert_values(&engine, &[1, 2]);
    let result = engine
        .query(
            "shop",
            "items",
            &Filter::match_all(),
            &QueryOptions::default().with_skip(5),
        )
        .unwrap();
    assert!(result.documents.is_empty());
    assert_eq!(result.count, 0);
    assert_eq!(result.total_matches, 2);
}

#[test]
fn limit_zero_returns_nothing() {
    let engine = seeded_engine();
    insert_values(&engine, &[1, 2]);
    let result = engine
        .query(
            "shop",
            "items",
            &Filter::match_all(),
            &QueryOptions::default().with_limit(0),
        )
        .unwrap();
    assert_eq!(result.count, 0);
    assert_eq!(result.total_matches, 2);
}

#[test]
fn mixed_types_sort_without_panicking() {
    let engine = seeded_engine();
    for (id, v) in [
        ("a", json!("pear")),
        ("b", json!(2)),
        ("c", json!(null)),
        ("d", json!(true)),
        ("e", json!(1)),
        ("f", json!({"x": 1})),
    ] {
        engine
            .create_document("shop", "items", Some(id), doc(json!({ "v": v })))
            .unwrap();
    }
    let result = engine
        .query(
            "shop",
            "items",
            &Filter::match_all(),
            &QueryOptions::default().with_sort("v", true),
        )
        .unwrap();
    assert_eq!(result.count, 6);
    // Numbers come before non-numbers
    assert_eq!(values(&result)[..2], nums(&[1, 2])[..]);
}
