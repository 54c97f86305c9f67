//! # MPDB Executor
//!
//! Command layer between the wire and the engine:
//! - [`request`] decodes a JSON request line into a [`Command`]
//! - [`Executor`] dispatches commands to the [`Engine`](mpdb_engine::Engine)
//! - [`Response`] encodes the outcome as one JSON response line
//!
//! ## Quick Start
//!
//! ```text
//! use mpdb_engine::Engine;
//! use mpdb_executor::Executor;
//!
//! let executor = Executor::new(Engine::open("data/mpdb_data.json"));
//! let reply = executor.handle_line(r#"{"action":"CREATE_DB","dbName":"shop"}"#);
//! // {"status":"success","message":"Database 'shop' created."}
//! ```
//!
//! ## Actions
//!
//! | Action | Required parameters | Response fields |
//! |--------|---------------------|-----------------|
//! | `CREATE_DB` | `dbName` | `message` |
//! | `LIST_DB` | | `data` |
//! | `READ_DB` | `dbName` | `data` |
//! | `DELETE_DB` | `dbName` | `message` |
//! | `CREATE_COLLECTION` | `dbName`, `collectionName` | `message` |
//! | `LIST_COLLECTIONS` | `dbName` | `collections` |
//! | `DELETE_COLLECTION` | `dbName`, `collectionName` | `message` |
//! | `CREATE_DOCUMENT` | `dbName`, `collectionName`, `document` | `message`, `documentId` |
//! | `READ_DOCUMENT` | `dbName`, `collectionName`, `documentId` | `document`, `documentId` |
//! | `READ_DOCUMENTS` | `dbName`, `collectionName` | `documents`, `count` |
//! | `UPDATE_DOCUMENT` | `dbName`, `collectionName`, `documentId`, `updates` | `message`, `documentId`, `document` |
//! | `DELETE_DOCUMENT` | `dbName`, `collectionName`, `documentId` | `message` |
//! | `QUERY` | `dbName`, `collectionName`, `query` | `documents`, `count`, `totalMatches` |

#![warn(missing_docs)]

mod command;
mod executor;
mod output;
pub mod request;
mod response;


// =============================================================================
// Public API
// =============================================================================

pub use command::Command;
pub use executor::Executor;
pub use output::Output;
pub use request::{decode_line, decode_request};
pub use response::{Response, Status};

pub use mpdb_core::{Error, ErrorKind, Value};

/// Result type for executor operations
pub type Result<T> = mpdb_core::Result<T>;
