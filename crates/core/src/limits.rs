//! Size limits for names and document bodies
//!
//! Violations are reported as `InvalidArgument`.

use crate::error::{Error, Result};
use crate::{Map, Value};

/// Most container levels wrapped around a body: three in a snapshot
/// (database, collection, id), at most two in a request (`params`).
/// Body depth plus this must stay under serde_json's recursion limit of 128.
pub const ENVELOPE_DEPTH: usize = 3;

/// Size limits enforced by the store before any mutation
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum database/collection/document id length in bytes (default: 1024)
    pub max_name_bytes: usize,

    /// Maximum nesting depth of a document body (default: 100)
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_name_bytes: 1024,
            max_nesting_depth: 100,
        }
    }
}

impl Limits {
    /// Trim a name and check it is usable.
    ///
    /// `what` names the parameter in the error message
    /// (`"Database name"`, `"Collection name"`, ...).
    pub fn validate_name<'a>(&self, what: &str, name: &'a str) -> Result<&'a str> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_argument(format!("{} is required.", what)));
        }
        if trimmed.len() > self.max_name_bytes {
            return Err(Error::invalid_argument(format!(
                "{} exceeds maximum length of {} bytes.",
                what, self.max_name_bytes
            )));
        }
        if trimmed.contains('\0') {
            return Err(Error::invalid_argument(format!(
                "{} must not contain NUL bytes.",
                what
            )));
        }
        Ok(trimmed)
    }

    /// Check that a document body is an object within the depth limit
    pub fn validate_body(&self, what: &str, body: &Value) -> Result<()> {
        if !body.is_object() {
            return Err(Error::invalid_argument(format!(
                "{} must be an object, got {}.",
                what,
                body.type_name()
            )));
        }
        self.check_depth(what, body.depth())
    }

    /// Check that an update patch keeps the body within the depth limit.
    ///
    /// The merged body is no deeper than the stored one or the patch taken
    /// as an object, and the stored one was checked when written.
    pub fn validate_fields(&self, what: &str, fields: &Map) -> Result<()> {
        let depth = 1 + fields.values().map(Value::depth).max().unwrap_or(0);
        self.check_depth(what, depth)
    }

    fn check_depth(&self, what: &str, depth: usize) -> Result<()> {
        if depth > self.max_nesting_depth {
            return Err(Error::invalid_argument(format!(
                "{} nesting depth {} exceeds maximum of {}.",
                what, depth, self.max_nesting_depth
            )));
        }
        Ok(())
    }
}
