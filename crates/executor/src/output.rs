//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. The mapping is
//! deterministic: the same command always produces the same variant, though
//! the values depend on the store.

use mpdb_core::Value;
use mpdb_engine::{Document, QueryResult};

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, as documented on the command.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Confirmation text (create/delete operations)
    Message(String),

    /// Database names in ascending order
    DatabaseNames(Vec<String>),

    /// `{collection: {id: body}}` of one database
    DatabaseContents(Value),

    /// Collection names in ascending order
    CollectionNames(Vec<String>),

    /// A document was inserted
    DocumentCreated {
        /// Confirmation text
        message: String,
        /// Id of the new document
        id: String,
    },

    /// One document
    Document(Document),

    /// Every document of a collection, in insertion order
    Documents(Vec<Document>),

    /// A document was merged
    DocumentUpdated {
        /// Confirmation text
        message: String,
        /// Merged document
        document: Document,
    },

    /// Query window plus the pre-pagination match count
    QueryResult(QueryResult),
}
