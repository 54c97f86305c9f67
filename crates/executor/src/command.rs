//! Command enum defining all MPDB operations.
//!
//! Commands are the instruction set of the daemon. Every request line decodes
//! into exactly one variant, and every variant carries all parameters it
//! needs, already validated for presence and shape.

use mpdb_core::Map;
use mpdb_engine::QueryOptions;

/// A decoded, self-contained operation.
///
/// # Command Categories
///
/// | Category | Count | Wire actions |
/// |----------|-------|--------------|
/// | Database | 4 | `CREATE_DB`, `LIST_DB`, `READ_DB`, `DELETE_DB` |
/// | Collection | 3 | `CREATE_COLLECTION`, `LIST_COLLECTIONS`, `DELETE_COLLECTION` |
/// | Document | 5 | `CREATE_DOCUMENT`, `READ_DOCUMENT`, `READ_DOCUMENTS`, `UPDATE_DOCUMENT`, `DELETE_DOCUMENT` |
/// | Query | 1 | `QUERY` |
///
/// `READ_COLLECTIONS` is accepted as an alias of `LIST_COLLECTIONS`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ==================== Database (4) ====================
    /// Create an empty database.
    /// Returns: `Output::Message`
    CreateDatabase {
        /// Database name
        db: String,
    },

    /// List database names.
    /// Returns: `Output::DatabaseNames`
    ListDatabases,

    /// Dump every collection and document of a database.
    /// Returns: `Output::DatabaseContents`
    ReadDatabase {
        /// Database name
        db: String,
    },

    /// Delete a database and everything in it.
    /// Returns: `Output::Message`
    DeleteDatabase {
        /// Database name
        db: String,
    },

    // ==================== Collection (3) ====================
    /// Create an empty collection.
    /// Returns: `Output::Message`
    CreateCollection {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
    },

    /// List the collections of a database.
    /// Returns: `Output::CollectionNames`
    ListCollections {
        /// Database name
        db: String,
    },

    /// Delete a collection and its documents.
    /// Returns: `Output::Message`
    DeleteCollection {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
    },

    // ==================== Document (5) ====================
    /// Insert a document. Without an id one is generated.
    /// Returns: `Output::DocumentCreated`
    CreateDocument {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
        /// Explicit document id
        id: Option<String>,
        /// Document body
        document: Map,
    },

    /// Read one document.
    /// Returns: `Output::Document`
    ReadDocument {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
        /// Document id
        id: String,
    },

    /// Read every document of a collection.
    /// Returns: `Output::Documents`
    ReadDocuments {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
    },

    /// Shallow-merge `updates` into a document.
    /// Returns: `Output::DocumentUpdated`
    UpdateDocument {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
        /// Document id
        id: String,
        /// Top-level fields to overwrite or add
        updates: Map,
    },

    /// Delete one document.
    /// Returns: `Output::Message`
    DeleteDocument {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
        /// Document id
        id: String,
    },

    // ==================== Query (1) ====================
    /// Filter, sort and paginate a collection.
    /// Returns: `Output::QueryResult`
    Query {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
        /// Filter object
        query: Map,
        /// Sort and pagination
        options: QueryOptions,
    },
}

impl Command {
    /// Wire name of the action, used in logs
    pub fn action(&self) -> &'static str {
        match self {
            Command::CreateDatabase { .. } => "CREATE_DB",
            Command::ListDatabases => "LIST_DB",
            Command::ReadDatabase { .. } => "READ_DB",
            Command::DeleteDatabase { .. } => "DELETE_DB",
            Command::CreateCollection { .. } => "CREATE_COLLECTION",
            Command::ListCollections { .. } => "LIST_COLLECTIONS",
            Command::DeleteCollection { .. } => "DELETE_COLLECTION",
            Command::CreateDocument { .. } => "CREATE_DOCUMENT",
            Command::ReadDocument { .. } => "READ_DOCUMENT",
            Command::ReadDocuments { .. } => "READ_DOCUMENTS",
            Command::UpdateDocument { .. } => "UPDATE_DOCUMENT",
            Command::DeleteDocument { .. } => "DELETE_DOCUMENT",
            Command::Query { .. } => "QUERY",
        }
    }

    /// Whether the command changes the store (and triggers a snapshot)
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::CreateDatabase { .. }
                | Command::DeleteDatabase { .. }
                | Command::CreateCollection { .. }
                | Command::DeleteCollection { .. }
                | Command::CreateDocument { .. }
                | Command::UpdateDocument { .. }
                | Command::DeleteDocument { .. }
        )
    }
}
