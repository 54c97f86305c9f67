//! The Executor - single entry point to the MPDB engine.
//!
//! The Executor is a stateless dispatcher that routes commands to engine
//! operations and converts results to outputs.

use std::sync::Arc;

use mpdb_core::Value;
use mpdb_engine::{Document, Engine, Filter};
use tracing::{debug, warn};

use crate::request::decode_line;
use crate::response::Response;
use crate::{Command, Output, Result};

/// The command executor.
///
/// The Executor is **stateless**: it holds a reference to the engine but no
/// state of its own. All data lives in the engine.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and cheap to clone; every connection worker
/// holds its own clone.
///
/// # Example
///
/// ```ignore
/// use mpdb_engine::Engine;
/// use mpdb_executor::{Command, Executor};
///
/// let executor = Executor::new(Engine::cache());
/// executor.execute(Command::CreateDatabase { db: "shop".into() })?;
///
/// let line = executor.handle_line(r#"{"action":"LIST_DB"}"#);
/// assert_eq!(line, r#"{"status":"success","data":["shop"]}"#);
/// ```
#[derive(Clone)]
pub struct Executor {
    engine: Arc<Engine>,
}

impl Executor {
    /// Create a new executor over an engine.
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// The engine this executor dispatches to
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let engine = &self.engine;
        match cmd {
            // Database commands
            Command::CreateDatabase { db } => {
                engine.create_database(&db)?;
                Ok(Output::Message(format!("Database '{}' created.", db)))
            }
            Command::ListDatabases => Ok(Output::DatabaseNames(engine.list_databases())),
            Command::ReadDatabase { db } => {
                Ok(Output::DatabaseContents(engine.read_database(&db)?))
            }
            Command::DeleteDatabase { db } => {
                engine.delete_database(&db)?;
                Ok(Output::Message(format!("Database '{}' deleted.", db)))
            }

            // Collection commands
            Command::CreateCollection { db, collection } => {
                engine.create_collection(&db, &collection)?;
                Ok(Output::Message(format!(
                    "Collection '{}' created in database '{}'.",
                    collection, db
                )))
            }
            Command::ListCollections { db } => {
                Ok(Output::CollectionNames(engine.list_collections(&db)?))
            }
            Command::DeleteCollection { db, collection } => {
                engine.delete_collection(&db, &collection)?;
                Ok(Output::Message(format!(
                    "Collection '{}' deleted from database '{}'.",
                    collection, db
                )))
            }

            // Document commands
            Command::CreateDocument {
                db,
                collection,
                id,
                document,
            } => {
                let id = engine.create_document(
                    &db,
                    &collection,
                    id.as_deref(),
                    Value::Object(document),
                )?;
                Ok(Output::DocumentCreated {
                    message: format!("Document inserted into collection '{}'.", collection),
                    id,
                })
            }
            Command::ReadDocument { db, collection, id } => {
                let body = engine.read_document(&db, &collection, &id)?;
                Ok(Output::Document(Document { id, body }))
            }
            Command::ReadDocuments { db, collection } => {
                Ok(Output::Documents(engine.read_all_documents(&db, &collection)?))
            }
            Command::UpdateDocument {
                db,
                collection,
                id,
                updates,
            } => {
                let body = engine.update_document(&db, &collection, &id, updates)?;
                Ok(Output::DocumentUpdated {
                    message: "Document updated successfully.".to_string(),
                    document: Document { id, body },
                })
            }
            Command::DeleteDocument { db, collection, id } => {
                engine.delete_document(&db, &collection, &id)?;
                Ok(Output::Message(format!(
                    "Document with ID '{}' deleted successfully.",
                    id
                )))
            }

            // Query
            Command::Query {
                db,
                collection,
                query,
                options,
            } => {
                let filter = Filter::parse(&query);
                Ok(Output::QueryResult(
                    engine.query(&db, &collection, &filter, &options)?,
                ))
            }
        }
    }

    /// Execute multiple commands sequentially.
    ///
    /// Returns one result per command, in order. A failing command does not
    /// stop the batch.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    /// Handle one request line and produce one response line.
    ///
    /// Never fails: decoding and execution errors become error responses.
    pub fn handle_line(&self, line: &str) -> String {
        self.handle(line).to_line()
    }

    /// Like [`handle_line`](Self::handle_line), returning the structured response
    pub fn handle(&self, line: &str) -> Response {
        let cmd = match decode_line(line.trim()) {
            Ok(cmd) => cmd,
            Err(e) => {
                debug!(error = %e, "Rejected request");
                return Response::error(&e);
            }
        };

        let action = cmd.action();
        match self.execute(cmd) {
            Ok(output) => {
                debug!(action, "Command succeeded");
                Response::success(output)
            }
            Err(e) => {
                if e.kind() == mpdb_core::ErrorKind::PersistenceFailure {
                    warn!(action, error = %e, "Command failed");
                } else {
                    debug!(action, error = %e, "Command failed");
                }
                Response::error(&e)
            }
        }
    }
}
