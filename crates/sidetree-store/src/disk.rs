use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sidetree_types::{ComponentState, Lifecycle};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvEngine;

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// Durable key-value engine backed by a sled database.
///
/// The handle is opened once and closed once. [`SledEngine::close`] drops the
/// database handle, and every later operation, including a second close,
/// fails with [`StoreError::Closed`].
pub struct SledEngine {
    db: Mutex<Option<sled::Db>>,
    path: PathBuf,
    lifecycle: Lifecycle,
}

impl SledEngine {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path)?;
        let lifecycle = Lifecycle::new("storage");
        lifecycle
            .claim_start()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        info!(path = %path.display(), "storage opened");
        Ok(Self {
            db: Mutex::new(Some(db)),
            path,
            lifecycle,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> ComponentState {
        self.lifecycle.state()
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> StoreResult<()> {
        let bytes = self.with_db(|db| Ok(db.flush()?))?;
        debug!(bytes, "storage flushed");
        Ok(())
    }

    /// Flush and release the handle.
    ///
    /// The handle counts as closed even if the final flush fails; the
    /// database files are unlocked once this returns.
    pub fn close(&self) -> StoreResult<()> {
        self.lifecycle.claim_stop().map_err(|_| StoreError::Closed)?;
        let db = self
            .db
            .lock()
            .expect("storage lock poisoned")
            .take()
            .ok_or(StoreError::Closed)?;
        let flushed = db.flush();
        drop(db);
        flushed?;
        info!(path = %self.path.display(), "storage closed");
        Ok(())
    }

    fn with_db<T>(&self, f: impl FnOnce(&sled::Db) -> StoreResult<T>) -> StoreResult<T> {
        let guard = self.db.lock().expect("storage lock poisoned");
        match guard.as_ref() {
            Some(db) if self.lifecycle.is_running() => f(db),
            _ => Err(StoreError::Closed),
        }
    }
}

impl KvEngine for SledEngine {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.with_db(|db| Ok(db.get(key)?.map(|v| v.to_vec())))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.with_db(|db| {
            db.insert(key, value)?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for SledEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledEngine")
            .field("path", &self.path)
            .field("state", &self.state())
            .finish()
    }
}
