//! Persistence: a single key-value slot holding the serialized document.
//!
//! The wizard writes through on every mutation. Stores only ever see a borrowed
//! snapshot, never the session's own document.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::document::Document;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load/save/clear contract for the document slot. Read-your-writes within a session.
pub trait DocumentStore: Send + Sync {
    fn save(&self, document: &Document) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<Document>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Stored shape
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    key: String,
    saved_at: DateTime<Utc>,
    document: Document,
}

/// Accepts both the envelope and a bare document, as written by the browser slot.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    Envelope(StoredDocument),
    Bare(Document),
}

fn encode(key: &str, document: &Document) -> Result<Vec<u8>, StoreError> {
    let stored = StoredDocument {
        key: key.to_string(),
        saved_at: Utc::now(),
        document: document.clone(),
    };
    Ok(serde_json::to_vec_pretty(&stored)?)
}

/// A slot that cannot be parsed is reported and treated as empty.
fn decode(key: &str, raw: &[u8]) -> Option<Document> {
    match serde_json::from_slice::<StoredShape>(raw) {
        Ok(StoredShape::Envelope(stored)) => Some(stored.document),
        Ok(StoredShape::Bare(document)) => Some(document),
        Err(e) => {
            warn!(key, "discarding unreadable stored document: {e}");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File store
// ────────────────────────────────────────────────────────────────────────────

/// One JSON file per slot key under `dir`, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let path = self.path();
        let bytes = encode(&self.key, document)?;
        self.write_atomic(&path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "document saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<Document>, StoreError> {
        let path = self.path();
        match std::fs::read(&path) {
            Ok(raw) => Ok(decode(&self.key, &raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the serialized slot in memory. Goes through the same encoding as
/// `FileStore`, so round-trip behavior matches.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: std::sync::Mutex<Option<Vec<u8>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes currently stored, or `None` when the slot is empty.
    pub fn stored_len(&self) -> Option<usize> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Vec::len)
    }
}

#[cfg(test)]
const MEMORY_KEY: &str = "memory";

#[cfg(test)]
impl DocumentStore for MemoryStore {
    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = encode(MEMORY_KEY, document)?;
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(bytes);
        Ok(())
    }

    fn load(&self) -> Result<Option<Document>, StoreError> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.as_deref().and_then(|raw| decode(MEMORY_KEY, raw)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
