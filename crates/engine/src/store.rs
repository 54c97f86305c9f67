//! The document tree: store → database → collection → document
//!
//! ## Design: PLAIN OWNED DATA
//!
//! `Store` owns its databases, which own their collections, which own their
//! document bodies. There are no locks and no interior mutability here: the
//! [`Engine`](crate::Engine) puts the whole tree behind one lock and triggers
//! persistence after each mutation.
//!
//! ## Serialized shape
//!
//! The serde form is exactly the snapshot artifact:
//! `{ database: { collection: { document id: body } } }`.
//!
//! ## Atomicity
//!
//! Every mutating method performs all of its lookups and checks before it
//! touches the tree, so a failed call leaves the store unchanged.

use indexmap::IndexMap;
use mpdb_core::{Error, Map, Result, Value};
use serde::{Deserialize, Serialize};

use crate::id::generate_document_id;
use crate::query::{Filter, QueryOptions, QueryResult};

/// A document as returned by reads and queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Id, unique within its collection
    pub id: String,
    /// Body, always an object
    pub body: Value,
}

/// Named container of documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    documents: IndexMap<String, Value>,
}

impl Collection {
    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Body of a document by id
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.documents.get(id)
    }

    /// Iterate `(id, body)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.documents.iter()
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.documents
                .iter()
                .map(|(id, body)| (id.clone(), body.clone()))
                .collect(),
        )
    }
}

/// Named container of collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    collections: IndexMap<String, Collection>,
}

impl Database {
    /// Number of collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// True when the database holds no collections
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// A collection by name
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.collections
                .iter()
                .map(|(name, coll)| (name.clone(), coll.to_value()))
                .collect(),
        )
    }
}

/// The single root of all data in a process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    databases: IndexMap<String, Database>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of databases
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    /// True when the store holds no databases
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// A database by name
    pub fn database(&self, name: &str) -> Option<&Database> {
        self.databases.get(name)
    }

    /// Total number of documents across every database and collection
    pub fn document_count(&self) -> usize {
        self.databases
            .values()
            .flat_map(|db| db.collections.values())
            .map(Collection::len)
            .sum()
    }

    // ========================================================================
    // Lookup helpers (top-down: database, then collection, then document)
    // ========================================================================

    fn db(&self, db: &str) -> Result<&Database> {
        self.databases.get(db).ok_or_else(|| Error::DatabaseNotFound {
            db: db.to_string(),
        })
    }

    fn db_mut(&mut self, db: &str) -> Result<&mut Database> {
        self.databases
            .get_mut(db)
            .ok_or_else(|| Error::DatabaseNotFound { db: db.to_string() })
    }

    fn coll(&self, db: &str, collection: &str) -> Result<&Collection> {
        self.db(db)?
            .collections
            .get(collection)
            .ok_or_else(|| Error::CollectionNotFound {
                db: db.to_string(),
                collection: collection.to_string(),
            })
    }

    fn coll_mut(&mut self, db: &str, collection: &str) -> Result<&mut Collection> {
        self.db_mut(db)?
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::CollectionNotFound {
                db: db.to_string(),
                collection: collection.to_string(),
            })
    }

    // ========================================================================
    // Databases
    // ========================================================================

    /// Insert an empty database. Fails if the name is taken.
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        if self.databases.contains_key(name) {
            return Err(Error::DatabaseExists {
                db: name.to_string(),
            });
        }
        self.databases.insert(name.to_string(), Database::default());
        Ok(())
    }

    /// Names of all databases, sorted
    pub fn list_databases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.keys().cloned().collect();
        names.sort();
        names
    }

    /// Materialize a database: `{collection: {id: body}}`
    pub fn read_database(&self, name: &str) -> Result<Value> {
        Ok(self.db(name)?.to_value())
    }

    /// Remove a database with all of its collections and documents
    pub fn delete_database(&mut self, name: &str) -> Result<()> {
        self.databases
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::DatabaseNotFound {
                db: name.to_string(),
            })
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Insert an empty collection into an existing database
    pub fn create_collection(&mut self, db: &str, name: &str) -> Result<()> {
        let database = self.db_mut(db)?;
        if database.collections.contains_key(name) {
            return Err(Error::CollectionExists {
                db: db.to_string(),
                collection: name.to_string(),
            });
        }
        database
            .collections
            .insert(name.to_string(), Collection::default());
        Ok(())
    }

    /// Names of all collections in a database, sorted
    pub fn list_collections(&self, db: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.db(db)?.collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Remove a collection and its documents
    pub fn delete_collection(&mut self, db: &str, name: &str) -> Result<()> {
        self.db_mut(db)?
            .collections
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::CollectionNotFound {
                db: db.to_string(),
                collection: name.to_string(),
            })
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Insert a document and return its id.
    ///
    /// With `id == None` a fresh id is generated. A taken id, explicit or
    /// generated, is reported as `DocumentExists`.
    pub fn create_document(
        &mut self,
        db: &str,
        collection: &str,
        id: Option<&str>,
        body: Value,
    ) -> Result<String> {
        let coll = self.coll_mut(db, collection)?;
        let id = match id {
            Some(id) => id.to_string(),
            None => generate_document_id(),
        };
        if coll.documents.contains_key(&id) {
            return Err(Error::DocumentExists { id });
        }
        coll.documents.insert(id.clone(), body);
        Ok(id)
    }

    /// Body of a single document
    pub fn read_document(&self, db: &str, collection: &str, id: &str) -> Result<Value> {
        self.coll(db, collection)?
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound { id: id.to_string() })
    }

    /// Every document of a collection in insertion order
    pub fn read_all_documents(&self, db: &str, collection: &str) -> Result<Vec<Document>> {
        Ok(self
            .coll(db, collection)?
            .documents
            .iter()
            .map(|(id, body)| Document {
                id: id.clone(),
                body: body.clone(),
            })
            .collect())
    }

    /// Shallow-merge `patch` into a document and return the merged body.
    ///
    /// Top-level patch keys overwrite, keys absent from the patch are kept.
    pub fn update_document(
        &mut self,
        db: &str,
        collection: &str,
        id: &str,
        patch: Map,
    ) -> Result<Value> {
        let body = self
            .coll_mut(db, collection)?
            .documents
            .get_mut(id)
            .ok_or_else(|| Error::DocumentNotFound { id: id.to_string() })?;
        shallow_merge(body, patch);
        Ok(body.clone())
    }

    /// Remove a document
    pub fn delete_document(&mut self, db: &str, collection: &str, id: &str) -> Result<()> {
        self.coll_mut(db, collection)?
            .documents
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::DocumentNotFound { id: id.to_string() })
    }

    /// Full scan of a collection: filter, then sort and paginate
    pub fn query(
        &self,
        db: &str,
        collection: &str,
        filter: &Filter,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        let matched = self
            .coll(db, collection)?
            .documents
            .iter()
            .filter(|(_, body)| filter.matches(body))
            .map(|(id, body)| Document {
                id: id.clone(),
                body: body.clone(),
            })
            .collect();
        Ok(options.apply(matched))
    }

    /// Verify every document body is an object.
    ///
    /// Used after decoding a snapshot, whose serde form cannot express
    /// that constraint.
    pub fn check_shape(&self) -> Result<()> {
        for (db_name, db) in &self.databases {
            for (coll_name, coll) in &db.collections {
                for (id, body) in &coll.documents {
                    if !body.is_object() {
                        return Err(Error::persistence(format!(
                            "document '{}' in {}.{} is a {}, expected an object",
                            id,
                            db_name,
                            coll_name,
                            body.type_name()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn shallow_merge(body: &mut Value, patch: Map) {
    match body {
        Value::Object(fields) => fields.extend(patch),
        other => *other = Value::Object(patch),
    }
}
