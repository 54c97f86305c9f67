//! Snapshot persistence
//!
//! The whole store is written after every successful mutation and read back
//! once at startup. This is a full-snapshot-per-write design: each mutation
//! costs O(total store size) in serialization and I/O. The [`Persistence`]
//! trait is the seam where an incremental log could replace it without
//! touching the store's operation contracts.
//!
//! ## File format
//!
//! Pretty-printed JSON with the store's exact shape:
//! `{ database: { collection: { id: body } } }`.
//!
//! ## Atomic write
//!
//! 1. Write to `<path>.tmp`
//! 2. fsync the temp file
//! 3. Rename temp to final (atomic on POSIX)
//!
//! A reader never sees a half-written snapshot; a crash mid-write leaves the
//! previous snapshot in place.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use mpdb_core::{Error, Result};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::store::Store;

/// Durable home of the store
pub trait Persistence: Send + Sync {
    /// Read the last saved store. A missing artifact is an empty store.
    fn load(&self) -> Result<Store>;

    /// Replace the saved store with `store`
    fn save(&self, store: &Store) -> Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

// ============================================================================
// JSON file snapshot
// ============================================================================

/// Snapshot stored as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    /// Snapshot at `path`; parent directories are created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Final snapshot path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_file(&self, store: &Store, path: &Path) -> Result<u64> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, store)
            .map_err(|e| Error::persistence(format!("failed to encode snapshot: {}", e)))?;
        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        file.sync_all()?;

        Ok(fs::metadata(path)?.len())
    }
}

impl Persistence for JsonFileSnapshot {
    fn load(&self) -> Result<Store> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No snapshot found, starting with an empty store");
            return Ok(Store::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let store: Store = serde_json::from_str(&content).map_err(|e| {
            Error::persistence(format!(
                "malformed snapshot '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        store.check_shape()?;

        info!(
            path = %self.path.display(),
            databases = store.len(),
            documents = store.document_count(),
            "Snapshot loaded"
        );
        Ok(store)
    }

    fn save(&self, store: &Store) -> Result<()> {
        let temp_path = self.temp_path();

        // Stale temp file from a previous failed attempt
        if temp_path.exists() {
            warn!(path = %temp_path.display(), "Removing stale temp file");
            let _ = fs::remove_file(&temp_path);
        }

        let size_bytes = match self.write_file(store, &temp_path) {
            Ok(size) => size,
            Err(e) => {
                warn!(
                    temp_path = %temp_path.display(),
                    error = %e,
                    "Write failed, cleaning up temp file"
                );
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            warn!(
                temp_path = %temp_path.display(),
                error = %e,
                "Rename failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Io(e));
        }

        debug!(path = %self.path.display(), size_bytes, "Snapshot written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

// ============================================================================
// In-memory (ephemeral)
// ============================================================================

/// Keeps the last saved store in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Option<Store>>,
    saves: AtomicU64,
}

impl MemoryPersistence {
    /// Start with nothing saved
    pub fn new() -> Self {
        Self::default()
    }

    /// Start as if `store` had been saved earlier
    pub fn with_store(store: Store) -> Self {
        Self {
            saved: Mutex::new(Some(store)),
            saves: AtomicU64::new(0),
        }
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last saved store, if any
    pub fn last_saved(&self) -> Option<Store> {
        self.saved.lock().clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Store> {
        Ok(self.saved.lock().clone().unwrap_or_default())
    }

    fn save(&self, store: &Store) -> Result<()> {
        *self.saved.lock() = Some(store.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl<P: Persistence + ?Sized> Persistence for std::sync::Arc<P> {
    fn load(&self) -> Result<Store> {
        (**self).load()
    }

    fn save(&self, store: &Store) -> Result<()> {
        (**self).save(store)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
