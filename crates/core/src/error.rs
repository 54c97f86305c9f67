//! Error types for mpdb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every variant belongs to exactly one [`ErrorKind`]. The kind is what the
//! wire protocol reports as `code`; the `Display` text becomes `message`.

use std::io;
use thiserror::Error;

/// Result type alias for mpdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories surfaced to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or empty required parameter
    InvalidArgument,
    /// Database, collection or document absent
    NotFound,
    /// Duplicate name or id on create
    AlreadyExists,
    /// Action name not recognized by the dispatcher
    UnknownAction,
    /// Request body that fails to parse as a structured value
    MalformedInput,
    /// Snapshot write or load error
    PersistenceFailure,
}

impl ErrorKind {
    /// Stable code string for the wire response
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::UnknownAction => "UnknownAction",
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::PersistenceFailure => "PersistenceFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error types for the mpdb document store
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, empty or ill-typed parameter
    #[error("{reason}")]
    InvalidArgument {
        /// Human-readable description of what is missing
        reason: String,
    },

    /// Database does not exist
    #[error("Database '{db}' not found.")]
    DatabaseNotFound {
        /// Database name
        db: String,
    },

    /// Collection does not exist in its database
    #[error("Collection '{collection}' not found in database '{db}'.")]
    CollectionNotFound {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
    },

    /// Document does not exist in its collection
    #[error("Document with ID '{id}' not found.")]
    DocumentNotFound {
        /// Document id
        id: String,
    },

    /// Database name already taken
    #[error("Database '{db}' already exists.")]
    DatabaseExists {
        /// Database name
        db: String,
    },

    /// Collection name already taken in its database
    #[error("Collection '{collection}' already exists in database '{db}'.")]
    CollectionExists {
        /// Database name
        db: String,
        /// Collection name
        collection: String,
    },

    /// Document id already taken in its collection
    #[error("Document with ID '{id}' already exists.")]
    DocumentExists {
        /// Document id
        id: String,
    },

    /// Dispatcher does not know the action
    #[error("Unknown action: {action}")]
    UnknownAction {
        /// The action as received
        action: String,
    },

    /// Request line or body is not a usable structured value
    #[error("Invalid JSON format: {reason}")]
    MalformedInput {
        /// Parser diagnostic
        reason: String,
    },

    /// Snapshot could not be encoded, decoded or written
    #[error("Persistence failure: {reason}")]
    Persistence {
        /// What went wrong
        reason: String,
    },

    /// I/O error while touching the snapshot file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::MalformedInput`]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Persistence`]
    pub fn persistence(reason: impl Into<String>) -> Self {
        Error::Persistence {
            reason: reason.into(),
        }
    }

    /// The category reported to clients
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::DatabaseNotFound { .. }
            | Error::CollectionNotFound { .. }
            | Error::DocumentNotFound { .. } => ErrorKind::NotFound,
            Error::DatabaseExists { .. }
            | Error::CollectionExists { .. }
            | Error::DocumentExists { .. } => ErrorKind::AlreadyExists,
            Error::UnknownAction { .. } => ErrorKind::UnknownAction,
            Error::MalformedInput { .. } => ErrorKind::MalformedInput,
            Error::Persistence { .. } | Error::Io(_) => ErrorKind::PersistenceFailure,
        }
    }

    /// True for any of the not-found variants
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// True for any of the already-exists variants
    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }
}
