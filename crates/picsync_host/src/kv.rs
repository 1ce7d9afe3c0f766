//! Simple key-value persistence for settings and the auth token.

use picsync_error::{HostError, HostErrorKind, JsonError, PicsyncResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Host key-value storage.
///
/// Values are plain strings; structured settings are stored as JSON text.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> PicsyncResult<()>;
}

/// Store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PicsyncResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| HostError::new(HostErrorKind::Storage(e.to_string())))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as one JSON object in a file.
///
/// Every `set` rewrites the file through a temp file + rename so a crash
/// never leaves a half-written settings file behind. Writes block; async
/// callers run `set` on the blocking pool.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but is not a JSON object of strings.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> PicsyncResult<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(JsonError::from)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(HostError::new(HostErrorKind::Storage(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        tracing::debug!(keys = values.len(), "Opened key-value store");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Default location: `$PICSYNC_STORE`, else `<config dir>/picsync/store.json`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("PICSYNC_STORE")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("picsync").join("store.json")))
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> PicsyncResult<()> {
        let storage_err = |e: std::io::Error| {
            HostError::new(HostErrorKind::Storage(format!("{}: {}", self.path.display(), e)))
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let text = serde_json::to_string_pretty(values).map_err(JsonError::from)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, text).map_err(storage_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(storage_err)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> PicsyncResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| HostError::new(HostErrorKind::Storage(e.to_string())))?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}
