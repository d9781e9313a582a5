//! Byte store collaborators
//!
//! Documents are immutable blobs: `put` always allocates a fresh id and
//! nothing ever overwrites an existing entry. The filesystem store covers
//! the prototype deployment; the in-memory store covers tests and
//! embedding.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::SignError;

/// Append-only blob storage keyed by opaque ids.
pub trait ByteStore: Send + Sync {
    /// Store bytes under a freshly allocated id and return the id.
    fn put(&self, bytes: Vec<u8>) -> Result<String, SignError>;

    /// Fetch the bytes stored under `id`, or [`SignError::NotFound`].
    fn get(&self, id: &str) -> Result<Vec<u8>, SignError>;
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// In-memory byte store.
#[derive(Default)]
pub struct MemoryByteStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryByteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteStore for MemoryByteStore {
    fn put(&self, bytes: Vec<u8>) -> Result<String, SignError> {
        let id = new_id();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SignError::Store("byte store mutex poisoned".into()))?;
        entries.insert(id.clone(), bytes);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Vec<u8>, SignError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SignError::Store("byte store mutex poisoned".into()))?;
        entries
            .get(id)
            .cloned()
            .ok_or_else(|| SignError::NotFound(id.to_string()))
    }
}

/// Filesystem byte store keeping one `<id>.pdf` file per document.
pub struct FsByteStore {
    dir: PathBuf,
}

impl FsByteStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    /// This is the one-time initialization; per-request paths assume the
    /// directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SignError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| SignError::Store(format!("cannot create {}: {}", dir.display(), e)))?;
        tracing::info!("byte store ready at {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, SignError> {
        // Ids are uuids we allocated; anything else never names an entry.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SignError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.pdf", id)))
    }
}

impl ByteStore for FsByteStore {
    fn put(&self, bytes: Vec<u8>) -> Result<String, SignError> {
        let id = new_id();
        let path = self.path_for(&id)?;
        std::fs::write(&path, bytes)
            .map_err(|e| SignError::Store(format!("cannot write {}: {}", path.display(), e)))?;
        tracing::debug!("stored document {} at {}", id, path.display());
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Vec<u8>, SignError> {
        let path = self.path_for(id)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SignError::NotFound(id.to_string()))
            }
            Err(e) => Err(SignError::Store(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
