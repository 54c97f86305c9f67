//! Document engine for MPDB
//!
//! This crate owns all data in a process:
//! - Store: the database → collection → document tree
//! - Query: filter parsing, matching, sorting and pagination
//! - Persistence: snapshot load at startup and save after every mutation
//! - Engine: the thread-safe handle that serializes mutations
//!
//! The engine knows nothing about the wire protocol; request decoding lives
//! in `mpdb-executor`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod engine;
pub mod id;
pub mod persistence;
pub mod query;
pub mod store;

pub use engine::Engine;
pub use id::generate_document_id;
pub use persistence::{JsonFileSnapshot, MemoryPersistence, Persistence};
pub use query::{Filter, Operator, QueryOptions, QueryResult};
pub use store::{Collection, Database, Document, Store};
