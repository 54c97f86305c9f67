//! Sorting and pagination over the matched set

use std::cmp::Ordering;

use mpdb_core::Value;

use super::compare::sort_key_order;
use crate::store::Document;

/// How to order and window the documents a filter matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Top-level field to sort by; `None` keeps insertion order
    pub sort_by: Option<String>,
    /// Sort direction (default: true)
    pub ascending: bool,
    /// Number of sorted matches to drop (default: 0)
    pub skip: usize,
    /// Maximum number of documents returned (default: unbounded)
    pub limit: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sort_by: None,
            ascending: true,
            skip: 0,
            limit: None,
        }
    }
}

impl QueryOptions {
    /// Sort by `field` in the given direction
    pub fn with_sort(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_by = Some(field.into());
        self.ascending = ascending;
        self
    }

    /// Skip the first `skip` matches
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Return at most `limit` documents
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort `matched`, then cut the window `[skip, skip + limit)`
    pub fn apply(&self, mut matched: Vec<Document>) -> QueryResult {
        let total_matches = matched.len();

        if let Some(field) = &self.sort_by {
            matched.sort_by(|a, b| {
                sort_order(a.body.get(field), b.body.get(field), self.ascending)
            });
        }

        let start = self.skip.min(total_matches);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(total_matches),
            None => total_matches,
        };
        let documents: Vec<Document> = matched.drain(start..end).collect();

        QueryResult {
            count: documents.len(),
            total_matches,
            documents,
        }
    }
}

/// Missing fields sort first ascending and last descending.
fn sort_order(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let ord = match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => sort_key_order(x, y),
    };
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}

/// Result of a query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Windowed documents in result order
    pub documents: Vec<Document>,
    /// Number of documents returned
    pub count: usize,
    /// Number of matches before pagination
    pub total_matches: usize,
}
