//! Many threads sharing one engine lose no updates.

use std::sync::{Arc, Barrier};
use std::thread;

use mpdb::{Engine, Executor, Filter, QueryOptions};
use serde_json::json;
use tempfile::TempDir;

use crate::{doc, seeded_engine};

#[test]
fn parallel_inserts_into_one_collection() {
    let engine = seeded_engine();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    engine
                        .create_document("shop", "items", None, doc(json!({ "thread": t })))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(engine.read_all_documents("shop", "items").unwrap().len(), 800);
}

#[test]
fn racing_creates_of_one_name_have_one_winner() {
    let engine = Engine::cache();
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                engine.create_database("contested").is_ok()
            })
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn parallel_updates_to_distinct_fields_all_land() {
    let engine = seeded_engine();
    engine
        .create_document("shop", "items", Some("shared"), doc(json!({})))
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut patch = mpdb::Map::new();
                patch.insert(format!("f{}", t), mpdb::Value::from(t as i64));
                engine.update_document("shop", "items", "shared", patch).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let body = engine.read_document("shop", "items", "shared").unwrap();
    assert_eq!(body.as_object().unwrap().len(), 10);
}

#[test]
fn readers_see_consistent_collections_during_writes() {
    let engine = seeded_engine();
    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..300 {
                engine
                    .create_document("shop", "items", Some(&format!("w{}", i)), doc(json!({"i": i})))
                    .unwrap();
            }
        })
    };
    let reader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let mut last = 0;
            for _ in 0..300 {
                let result = engine
                    .query("shop", "items", &Filter::match_all(), &QueryOptions::default())
                    .unwrap();
                assert!(result.total_matches >= last);
                assert_eq!(result.count, result.documents.len());
                last = result.total_matches;
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(engine.read_all_documents("shop", "items").unwrap().len(), 300);
}

#[test]
fn snapshot_after_concurrent_writes_has_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snap.json");
    let engine = Engine::open(&path);
    let executor = Executor::new(Arc::clone(&engine));
    executor.handle_line(r#"{"action":"CREATE_DB","dbName":"shop"}"#);
    executor.handle_line(r#"{"action":"CREATE_COLLECTION","dbName":"shop","collectionName":"items"}"#);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let executor = executor.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let line = json!({
                        "action": "CREATE_DOCUMENT",
                        "dbName": "shop",
                        "collectionName": "items",
                        "documentId": format!("t{}-{}", t, i),
                        "document": {"t": t}
                    })
                    .to_string();
                    assert!(executor.handle_line(&line).contains("\"success\""));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    drop(executor);
    drop(engine);

    let reopened = Engine::open(&path);
    assert_eq!(reopened.read_all_documents("shop", "items").unwrap().len(), 100);
}
