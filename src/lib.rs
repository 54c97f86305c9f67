//! MPDB - minimal networked document store
//!
//! Databases hold collections, collections hold JSON documents. Clients speak
//! line-delimited JSON over TCP (see the `mpdbd` binary in `mpdb-server`);
//! this crate exposes the same functionality in-process.
//!
//! # Quick Start
//!
//! ```ignore
//! use mpdb::{Engine, Executor};
//!
//! // In-memory store; use Engine::open(path) for a snapshot file
//! let executor = Executor::new(Engine::cache());
//!
//! executor.handle_line(r#"{"action":"CREATE_DB","dbName":"shop"}"#);
//! executor.handle_line(r#"{"action":"CREATE_COLLECTION","dbName":"shop","collectionName":"orders"}"#);
//! let reply = executor.handle_line(
//!     r#"{"action":"QUERY","dbName":"shop","collectionName":"orders","query":{"total":{"$gt":10}}}"#,
//! );
//! ```
//!
//! # Architecture
//!
//! - `mpdb-core`: [`Value`], [`Error`], [`Limits`]
//! - `mpdb-engine`: the store tree, query engine, snapshot persistence and
//!   the shared [`Engine`] handle
//! - `mpdb-executor`: request decoding, [`Command`] dispatch, [`Response`]
//!   encoding

pub use mpdb_core::{Error, ErrorKind, Limits, Map, Result, Value};
pub use mpdb_engine::{
    Document, Engine, Filter, JsonFileSnapshot, MemoryPersistence, Persistence, QueryOptions,
    QueryResult, Store,
};
pub use mpdb_executor::{Command, Executor, Output, Response, Status};
