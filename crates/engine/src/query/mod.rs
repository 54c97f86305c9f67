//! Query engine: filter parsing, matching, sorting and pagination
//!
//! Queries are full collection scans. A [`Filter`] is parsed once from the
//! filter object, evaluated against every document, and the matched set is
//! ordered and windowed by [`QueryOptions`].

mod compare;
mod filter;
mod options;

pub use compare::{compare_values, values_equal, NUMERIC_EPSILON};
pub use filter::{Filter, Operator};
pub use options::{QueryOptions, QueryResult};
