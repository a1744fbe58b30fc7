//! Persistence adapter: whole-document blobs under named keys.
//!
//! Every persisted blob is wrapped in a versioned envelope so future schema
//! additions can default gracefully when older saves are loaded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{fs, io};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PRODUCTS_KEY: &str = "eburger_products";
pub const ORDERS_KEY: &str = "eburger_orders";
pub const SETTINGS_KEY: &str = "eburger_settings";

/// Bumped whenever the persisted shape of any collection changes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("key {key}: saved with schema version {found}, this build understands {current}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        current: u32,
    },
}

/// Opaque key-value persistence. `load` returning `None` means the key has
/// never been saved and the caller should fall back to its documented default.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    data: T,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema_version: u32,
    data: &'a T,
}

pub fn load_state<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(blob) = storage.load(key)? else {
        return Ok(None);
    };
    let envelope: Envelope<T> = serde_json::from_str(&blob)?;
    if envelope.schema_version > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: envelope.schema_version,
            current: SCHEMA_VERSION,
        });
    }
    Ok(Some(envelope.data))
}

pub fn save_state<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    data: &T,
) -> Result<(), StorageError> {
    let blob = serde_json::to_string(&EnvelopeRef {
        schema_version: SCHEMA_VERSION,
        data,
    })?;
    storage.save(key, &blob)
}

/// One JSON file per key under a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        // Write-then-rename so a crash mid-save never truncates the old blob.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

/// In-memory backend for tests and demos.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("eburger-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn file_storage_round_trips_a_blob() {
        let dir = temp_dir();
        let storage = FileStorage::new(&dir).unwrap();

        assert!(storage.load(PRODUCTS_KEY).unwrap().is_none());

        save_state(&storage, PRODUCTS_KEY, &vec!["a".to_string(), "b".to_string()]).unwrap();
        let loaded: Option<Vec<String>> = load_state(&storage, PRODUCTS_KEY).unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn newer_schema_version_is_rejected() {
        let storage = MemoryStorage::new();
        storage
            .save(ORDERS_KEY, r#"{"schema_version":99,"data":[]}"#)
            .unwrap();

        let err = load_state::<Vec<String>>(&storage, ORDERS_KEY).unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn missing_key_loads_as_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Vec<String>> = load_state(&storage, SETTINGS_KEY).unwrap();
        assert!(loaded.is_none());
    }
}
