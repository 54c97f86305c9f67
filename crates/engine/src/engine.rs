//! The shared engine handle
//!
//! `Engine` is the single process-wide owner of the [`Store`]. Connection
//! workers share it through an `Arc<Engine>`.
//!
//! ## Concurrency
//!
//! One `RwLock` guards the whole tree:
//! - Reads (`read_*`, `list_*`, `query`) take the read lock and run in parallel.
//! - Mutations take the write lock and keep it across the snapshot write, so
//!   every saved snapshot is a point-in-time view and every mutation is
//!   persisted before the next one starts.
//!
//! Locks are scoped to one call; nothing is held across a network round trip.
//!
//! ## Validation
//!
//! Parameters are validated before the lock is taken. Lookups then run
//! top-down (database, collection, document).
//!
//! ## Persistence failures
//!
//! A failed save is logged and counted but does not roll back the mutation:
//! the live store stays correct, durability is best-effort.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mpdb_core::{Limits, Map, Result, Value};
use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::persistence::{JsonFileSnapshot, MemoryPersistence, Persistence};
use crate::query::{Filter, QueryOptions, QueryResult};
use crate::store::{Document, Store};

const DATABASE_NAME: &str = "Database name";
const COLLECTION_NAME: &str = "Collection name";
const DOCUMENT_ID: &str = "Document ID";

/// Thread-safe handle over the document store and its snapshot
pub struct Engine {
    store: RwLock<Store>,
    persistence: Box<dyn Persistence>,
    limits: Limits,
    save_failures: AtomicU64,
}

impl Engine {
    /// Open an engine backed by a JSON snapshot file.
    ///
    /// A missing file starts an empty store. An unreadable or malformed file
    /// is logged and also starts an empty store.
    pub fn open<P: AsRef<Path>>(snapshot_path: P) -> Arc<Self> {
        Arc::new(Self::with_persistence(
            Box::new(JsonFileSnapshot::new(snapshot_path.as_ref())),
            Limits::default(),
        ))
    }

    /// Open an in-memory engine; nothing is written to disk
    pub fn cache() -> Arc<Self> {
        Arc::new(Self::with_persistence(
            Box::new(MemoryPersistence::new()),
            Limits::default(),
        ))
    }

    /// Open an engine on any persistence backend
    pub fn with_persistence(persistence: Box<dyn Persistence>, limits: Limits) -> Self {
        let store = match persistence.load() {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    backend = %persistence.describe(),
                    error = %e,
                    "Failed to load snapshot, starting with an empty store"
                );
                Store::new()
            }
        };

        info!(
            backend = %persistence.describe(),
            databases = store.len(),
            documents = store.document_count(),
            "Engine opened"
        );

        Self {
            store: RwLock::new(store),
            persistence,
            limits,
            save_failures: AtomicU64::new(0),
        }
    }

    /// Number of snapshot writes that failed since open
    pub fn save_failures(&self) -> u64 {
        self.save_failures.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of the whole store
    pub fn snapshot(&self) -> Store {
        self.store.read().clone()
    }

    // ========================================================================
    // Lock discipline
    // ========================================================================

    fn read<T>(&self, op: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        let guard = self.store.read();
        op(&guard)
    }

    /// Apply a mutation and persist it while still holding the write lock
    fn mutate<T>(&self, action: &str, op: impl FnOnce(&mut Store) -> Result<T>) -> Result<T> {
        let mut guard = self.store.write();
        let out = op(&mut guard)?;
        if let Err(e) = self.persistence.save(&guard) {
            self.save_failures.fetch_add(1, Ordering::Relaxed);
            error!(
                action,
                backend = %self.persistence.describe(),
                error = %e,
                "Snapshot write failed; mutation kept in memory"
            );
        }
        Ok(out)
    }

    fn name<'a>(&self, what: &str, name: &'a str) -> Result<&'a str> {
        self.limits.validate_name(what, name)
    }

    // ========================================================================
    // Databases
    // ========================================================================

    /// Create an empty database
    pub fn create_database(&self, name: &str) -> Result<()> {
        let name = self.name(DATABASE_NAME, name)?;
        self.mutate("create_database", |s| s.create_database(name))?;
        info!(db = name, "Database created");
        Ok(())
    }

    /// Names of all databases
    pub fn list_databases(&self) -> Vec<String> {
        self.store.read().list_databases()
    }

    /// Every collection and document of a database
    pub fn read_database(&self, name: &str) -> Result<Value> {
        let name = self.name(DATABASE_NAME, name)?;
        self.read(|s| s.read_database(name))
    }

    /// Delete a database with everything in it
    pub fn delete_database(&self, name: &str) -> Result<()> {
        let name = self.name(DATABASE_NAME, name)?;
        self.mutate("delete_database", |s| s.delete_database(name))?;
        info!(db = name, "Database deleted");
        Ok(())
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Create an empty collection
    pub fn create_collection(&self, db: &str, name: &str) -> Result<()> {
        let db = self.name(DATABASE_NAME, db)?;
        let name = self.name(COLLECTION_NAME, name)?;
        self.mutate("create_collection", |s| s.create_collection(db, name))?;
        info!(db, collection = name, "Collection created");
        Ok(())
    }

    /// Names of the collections in a database
    pub fn list_collections(&self, db: &str) -> Result<Vec<String>> {
        let db = self.name(DATABASE_NAME, db)?;
        self.read(|s| s.list_collections(db))
    }

    /// Delete a collection with its documents
    pub fn delete_collection(&self, db: &str, name: &str) -> Result<()> {
        let db = self.name(DATABASE_NAME, db)?;
        let name = self.name(COLLECTION_NAME, name)?;
        self.mutate("delete_collection", |s| s.delete_collection(db, name))?;
        info!(db, collection = name, "Collection deleted");
        Ok(())
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Insert a document; a blank or absent `id` generates one
    pub fn create_document(
        &self,
        db: &str,
        collection: &str,
        id: Option<&str>,
        body: Value,
    ) -> Result<String> {
        let db = self.name(DATABASE_NAME, db)?;
        let collection = self.name(COLLECTION_NAME, collection)?;
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Some(self.name(DOCUMENT_ID, id)?),
            None => None,
        };
        self.limits.validate_body("Document", &body)?;

        let id = self.mutate("create_document", |s| {
            s.create_document(db, collection, id, body)
        })?;
        info!(db, collection, id = %id, "Document created");
        Ok(id)
    }

    /// Body of one document
    pub fn read_document(&self, db: &str, collection: &str, id: &str) -> Result<Value> {
        let db = self.name(DATABASE_NAME, db)?;
        let collection = self.name(COLLECTION_NAME, collection)?;
        let id = self.name(DOCUMENT_ID, id)?;
        self.read(|s| s.read_document(db, collection, id))
    }

    /// All documents of a collection
    pub fn read_all_documents(&self, db: &str, collection: &str) -> Result<Vec<Document>> {
        let db = self.name(DATABASE_NAME, db)?;
        let collection = self.name(COLLECTION_NAME, collection)?;
        self.read(|s| s.read_all_documents(db, collection))
    }

    /// Shallow-merge `patch` into a document and return the merged body
    pub fn update_document(
        &self,
        db: &str,
        collection: &str,
        id: &str,
        patch: Map,
    ) -> Result<Value> {
        let db = self.name(DATABASE_NAME, db)?;
        let collection = self.name(COLLECTION_NAME, collection)?;
        let id = self.name(DOCUMENT_ID, id)?;
        self.limits.validate_fields("Updates", &patch)?;

        let merged = self.mutate("update_document", |s| {
            let merged = s.update_document(db, collection, id, patch)?;
            Ok(merged)
        })?;
        info!(db, collection, id, "Document updated");
        Ok(merged)
    }

    /// Delete one document
    pub fn delete_document(&self, db: &str, collection: &str, id: &str) -> Result<()> {
        let db = self.name(DATABASE_NAME, db)?;
        let collection = self.name(COLLECTION_NAME, collection)?;
        let id = self.name(DOCUMENT_ID, id)?;
        self.mutate("delete_document", |s| s.delete_document(db, collection, id))?;
        info!(db, collection, id, "Document deleted");
        Ok(())
    }

    /// Filter a collection, then sort and paginate the matches
    pub fn query(
        &self,
        db: &str,
        collection: &str,
        filter: &Filter,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        let db = self.name(DATABASE_NAME, db)?;
        let collection = self.name(COLLECTION_NAME, collection)?;
        self.read(|s| s.query(db, collection, filter, options))
    }
}
