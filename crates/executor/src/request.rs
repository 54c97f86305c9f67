//! Request decoding: one JSON line → one [`Command`]
//!
//! A request is a flat JSON object with an `action` and the action's
//! parameters as sibling keys:
//!
//! ```text
//! {"action":"CREATE_COLLECTION","dbName":"shop","collectionName":"orders"}
//! ```
//!
//! Parameters may also be nested under `params`; nested keys win over
//! top-level keys of the same name.
//!
//! Names are trimmed, and a blank name counts as missing. `document`,
//! `updates` and `query` must be objects. `limit` and `skip` accept numbers
//! or numeric strings, clamping negatives to zero. `ascending` accepts
//! booleans or the strings `"true"` / `"false"`.

use mpdb_core::{Error, Map, Result, Value};
use mpdb_engine::QueryOptions;

use crate::Command;

/// Action reported when a request carries none
pub const UNKNOWN_ACTION: &str = "UNKNOWN";

const DB_NAME: &str = "dbName";
const COLLECTION_NAME: &str = "collectionName";
const DOCUMENT_ID: &str = "documentId";
const DOCUMENT: &str = "document";
const UPDATES: &str = "updates";
const QUERY: &str = "query";
const SORT_BY: &str = "sortBy";
const ASCENDING: &str = "ascending";
const LIMIT: &str = "limit";
const SKIP: &str = "skip";

/// Decode one request line
pub fn decode_line(line: &str) -> Result<Command> {
    let request: Value = serde_json::from_str(line).map_err(|e| Error::malformed(e.to_string()))?;
    decode_request(request)
}

/// Decode an already-parsed request object
pub fn decode_request(request: Value) -> Result<Command> {
    let mut fields = request
        .into_object()
        .ok_or_else(|| Error::malformed("request must be a JSON object"))?;

    if let Some(Value::Object(nested)) = fields.shift_remove("params") {
        fields.extend(nested);
    }

    let action = match fields.get("action").and_then(Value::as_str) {
        Some(action) => action.trim().to_string(),
        None => UNKNOWN_ACTION.to_string(),
    };

    Params(fields).into_command(&action)
}

struct Params(Map);

impl Params {
    fn into_command(self, action: &str) -> Result<Command> {
        let p = &self;
        let cmd = match action {
            "CREATE_DB" => {
                p.require(&[DB_NAME])?;
                Command::CreateDatabase { db: p.name(DB_NAME) }
            }
            "LIST_DB" => Command::ListDatabases,
            "READ_DB" => {
                p.require(&[DB_NAME])?;
                Command::ReadDatabase { db: p.name(DB_NAME) }
            }
            "DELETE_DB" => {
                p.require(&[DB_NAME])?;
                Command::DeleteDatabase { db: p.name(DB_NAME) }
            }
            "CREATE_COLLECTION" => {
                p.require(&[DB_NAME, COLLECTION_NAME])?;
                Command::CreateCollection {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                }
            }
            "LIST_COLLECTIONS" | "READ_COLLECTIONS" => {
                p.require(&[DB_NAME])?;
                Command::ListCollections { db: p.name(DB_NAME) }
            }
            "DELETE_COLLECTION" => {
                p.require(&[DB_NAME, COLLECTION_NAME])?;
                Command::DeleteCollection {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                }
            }
            "CREATE_DOCUMENT" => {
                p.require(&[DB_NAME, COLLECTION_NAME, DOCUMENT])?;
                Command::CreateDocument {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                    id: p.text(DOCUMENT_ID),
                    document: p.object(DOCUMENT).unwrap_or_default(),
                }
            }
            "READ_DOCUMENT" => {
                p.require(&[DB_NAME, COLLECTION_NAME, DOCUMENT_ID])?;
                Command::ReadDocument {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                    id: p.name(DOCUMENT_ID),
                }
            }
            "READ_DOCUMENTS" => {
                p.require(&[DB_NAME, COLLECTION_NAME])?;
                Command::ReadDocuments {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                }
            }
            "UPDATE_DOCUMENT" => {
                p.require(&[DB_NAME, COLLECTION_NAME, DOCUMENT_ID, UPDATES])?;
                Command::UpdateDocument {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                    id: p.name(DOCUMENT_ID),
                    updates: p.object(UPDATES).unwrap_or_default(),
                }
            }
            "DELETE_DOCUMENT" => {
                p.require(&[DB_NAME, COLLECTION_NAME, DOCUMENT_ID])?;
                Command::DeleteDocument {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                    id: p.name(DOCUMENT_ID),
                }
            }
            "QUERY" => {
                p.require(&[DB_NAME, COLLECTION_NAME, QUERY])?;
                Command::Query {
                    db: p.name(DB_NAME),
                    collection: p.name(COLLECTION_NAME),
                    query: p.object(QUERY).unwrap_or_default(),
                    options: p.query_options(),
                }
            }
            other => {
                return Err(Error::UnknownAction {
                    action: other.to_string(),
                })
            }
        };
        Ok(cmd)
    }

    /// Fail with one message naming every required parameter
    fn require(&self, keys: &[&str]) -> Result<()> {
        let present = |key: &&str| match *key {
            DOCUMENT | UPDATES | QUERY => self.object(key).is_some(),
            _ => self.text(key).is_some(),
        };
        if keys.iter().all(present) {
            Ok(())
        } else {
            Err(Error::invalid_argument(missing_message(keys)))
        }
    }

    /// Trimmed, non-blank string parameter. Numbers are accepted as text.
    fn text(&self, key: &str) -> Option<String> {
        let text = match self.0.get(key)? {
            Value::String(s) => s.trim().to_string(),
            v @ Value::Number(_) => v.canonical_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// A parameter `require` has already checked
    fn name(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    fn object(&self, key: &str) -> Option<Map> {
        self.0.get(key)?.as_object().cloned()
    }

    fn count(&self, key: &str) -> Option<usize> {
        let n = match self.0.get(key)? {
            Value::Number(n) => *n,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if n.is_nan() || n <= 0.0 {
            Some(0)
        } else {
            Some(n.trunc() as usize)
        }
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    fn query_options(&self) -> QueryOptions {
        QueryOptions {
            sort_by: self.text(SORT_BY),
            ascending: self.flag(ASCENDING).unwrap_or(true),
            skip: self.count(SKIP).unwrap_or(0),
            limit: self.count(LIMIT),
        }
    }
}

fn missing_message(keys: &[&str]) -> String {
    match keys {
        [] => "Missing required parameters.".to_string(),
        [DB_NAME] => "Database name is required.".to_string(),
        [only] => format!("{} is required.", only),
        [first, second] => format!("{} and {} are required.", first, second),
        [init @ .., last] => format!("{}, and {} are required.", init.join(", "), last),
    }
}
