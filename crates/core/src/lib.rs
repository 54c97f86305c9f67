//! Core types for mpdb
//!
//! This crate defines the foundational types shared by every layer:
//! - Value: the recursive structured-value type for document bodies and filters
//! - Error / ErrorKind: the error taxonomy reported to clients
//! - Limits: name and body validation applied before any mutation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use limits::Limits;
pub use value::{Map, Value};
