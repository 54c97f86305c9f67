//! Response envelope
//!
//! Every request line gets exactly one response line:
//! - Success: `{"status":"success", ...action fields}`
//! - Error: `{"status":"error","message":...,"code":...}`
//!
//! Clients can treat `status != "success"` as the only failure signal; `code`
//! is the stable [`ErrorKind`](mpdb_core::ErrorKind) name.
//!
//! Field names follow the daemon's camelCase wire convention
//! (`documentId`, `totalMatches`). Absent fields are omitted.

use mpdb_core::{Error, Value};
use mpdb_engine::Document;
use serde::{Deserialize, Serialize};

use crate::Output;

/// Outcome marker of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Command applied
    Success,
    /// Command rejected; see `message` and `code`
    Error,
}

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Success or failure
    pub status: Status,
    /// Human-readable confirmation or error text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error kind code (errors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// `LIST_DB` names or `READ_DB` contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// `LIST_COLLECTIONS` names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,
    /// Id of the created, read or updated document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Body of the read or updated document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
    /// `{id: body}` in result order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Value>,
    /// Number of documents in `documents`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Query matches before pagination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_matches: Option<usize>,
}

impl Response {
    fn empty(status: Status) -> Self {
        Response {
            status,
            message: None,
            code: None,
            data: None,
            collections: None,
            document_id: None,
            document: None,
            documents: None,
            count: None,
            total_matches: None,
        }
    }

    /// Success response carrying an output's fields
    pub fn success(output: Output) -> Self {
        let mut r = Response::empty(Status::Success);
        match output {
            Output::Message(message) => r.message = Some(message),
            Output::DatabaseNames(names) => {
                r.data = Some(Value::Array(names.into_iter().map(Value::String).collect()))
            }
            Output::DatabaseContents(contents) => r.data = Some(contents),
            Output::CollectionNames(names) => r.collections = Some(names),
            Output::DocumentCreated { message, id } => {
                r.message = Some(message);
                r.document_id = Some(id);
            }
            Output::Document(doc) => {
                r.document_id = Some(doc.id);
                r.document = Some(doc.body);
            }
            Output::Documents(docs) => {
                r.count = Some(docs.len());
                r.documents = Some(documents_object(docs));
            }
            Output::DocumentUpdated { message, document } => {
                r.message = Some(message);
                r.document_id = Some(document.id);
                r.document = Some(document.body);
            }
            Output::QueryResult(result) => {
                r.count = Some(result.count);
                r.total_matches = Some(result.total_matches);
                r.documents = Some(documents_object(result.documents));
            }
        }
        r
    }

    /// Error response for any command failure
    pub fn error(err: &Error) -> Self {
        let mut r = Response::empty(Status::Error);
        r.message = Some(err.to_string());
        r.code = Some(err.kind().code().to_string());
        r
    }

    /// Whether the command succeeded
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Encode as a single JSON line (no trailing newline)
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"status":"error","message":{},"code":"PersistenceFailure"}}"#,
                serde_json::Value::String(format!("failed to encode response: {}", e))
            )
        })
    }

    /// Decode a response line, as a client would
    pub fn from_line(line: &str) -> Result<Self, Error> {
        serde_json::from_str(line).map_err(|e| Error::malformed(e.to_string()))
    }
}

fn documents_object(docs: Vec<Document>) -> Value {
    Value::Object(docs.into_iter().map(|d| (d.id, d.body)).collect())
}
