//! Persistence middleware.
//!
//! Snapshots of the persisted half of the state are written under a fixed key
//! after every transition and read back once when the store is built. Storage
//! failures never reach the caller: they are logged and the store carries on
//! with its in-memory state.
//!
//! # Format
//!
//! ```json
//! { "state": { "allMovies": [], "searchBy": "batman", "filterBy": "" }, "version": 0 }
//! ```

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::plugin::{StorePlugin, Transition};

/// Errors raised by snapshot storage backends.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Storage I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode snapshot '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode snapshot '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid storage key '{key}'")]
    InvalidKey { key: String },
}

/// String key/value storage for serialized snapshots.
pub trait SnapshotStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// State types with a serializable persisted subset.
pub trait Persistable: Sized {
    type Snapshot: Serialize + DeserializeOwned;

    fn to_snapshot(&self) -> Self::Snapshot;

    /// Merge a restored snapshot into `self`.
    fn restore(self, snapshot: Self::Snapshot) -> Self;
}

/// In-process storage. Contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary file that is renamed into place, under an
/// exclusive lock on `<key>.lock`, so a crash or a second process never
/// leaves a half-written snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    directory: PathBuf,
}

impl JsonFileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| PersistError::Io {
            path: directory.clone(),
            source: e,
        })?;
        tracing::debug!(directory = %directory.display(), "snapshot storage opened");
        Ok(Self { directory })
    }

    /// `dirs::data_dir()/moviestore`, or `./moviestore` when unavailable.
    pub fn default_directory() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("moviestore")
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the snapshot file for `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(PersistError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.directory.join(format!("{key}.json")))
    }

    fn lock(&self, key: &str) -> Result<fs::File, PersistError> {
        let lock_path = self.directory.join(format!("{key}.lock"));
        let io_error = |source: std::io::Error| PersistError::Io {
            path: lock_path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(io_error)?;
        // Released when the returned handle is dropped.
        file.lock_exclusive().map_err(io_error)?;
        Ok(file)
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| PersistError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(Some(content))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let _lock = self.lock(key)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|e| PersistError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| PersistError::Io {
            path: path.clone(),
            source: e,
        })?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "snapshot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let _lock = self.lock(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| PersistError::Io {
                path: path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedEnvelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// Store plugin persisting `S::Snapshot` under a fixed key.
pub struct PersistPlugin<S> {
    key: String,
    version: u32,
    storage: Arc<dyn SnapshotStorage>,
    _state: PhantomData<fn() -> S>,
}

impl<S: Persistable> PersistPlugin<S> {
    pub fn new(key: impl Into<String>, storage: Arc<dyn SnapshotStorage>) -> Self {
        Self {
            key: key.into(),
            version: 0,
            storage,
            _state: PhantomData,
        }
    }

    /// Snapshots written with a different version are ignored on restore.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted snapshot, if a compatible one exists.
    pub fn read(&self) -> Result<Option<S::Snapshot>, PersistError> {
        let Some(raw) = self.storage.load(&self.key)? else {
            return Ok(None);
        };
        let envelope: PersistedEnvelope<S::Snapshot> =
            serde_json::from_str(&raw).map_err(|e| PersistError::Decode {
                key: self.key.clone(),
                source: e,
            })?;

        if envelope.version != self.version {
            tracing::warn!(
                key = %self.key,
                stored_version = envelope.version,
                expected_version = self.version,
                "persisted snapshot version mismatch, ignoring it"
            );
            return Ok(None);
        }
        Ok(Some(envelope.state))
    }

    /// Serialize and store the persisted subset of `state`.
    pub fn write(&self, state: &S) -> Result<(), PersistError> {
        let envelope = PersistedEnvelope {
            state: state.to_snapshot(),
            version: self.version,
        };
        let raw = serde_json::to_string(&envelope).map_err(|e| PersistError::Encode {
            key: self.key.clone(),
            source: e,
        })?;
        self.storage.save(&self.key, &raw)
    }

    /// Delete the persisted snapshot.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.storage.remove(&self.key)
    }
}

impl<S: Persistable> StorePlugin<S> for PersistPlugin<S> {
    fn name(&self) -> &'static str {
        "persist"
    }

    fn on_init(&self, state: S) -> S {
        match self.read() {
            Ok(Some(snapshot)) => {
                tracing::debug!(key = %self.key, "restored persisted snapshot");
                state.restore(snapshot)
            }
            Ok(None) => state,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to restore snapshot, using initial state");
                state
            }
        }
    }

    fn on_transition(&self, transition: &Transition<'_, S>) {
        if let Err(e) = self.write(transition.next) {
            tracing::warn!(
                key = %self.key,
                revision = transition.revision,
                error = %e,
                "failed to persist snapshot"
            );
        }
    }
}
