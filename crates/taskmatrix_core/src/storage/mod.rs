//! Key-value persistence boundary.
//!
//! # Responsibility
//! - Define the opaque get/set/remove/clear contract the store persists to.
//! - Wrap backends in a failure-tolerant, JSON-encoding facade (`Storage`).
//!
//! # Invariants
//! - `Storage` never returns backend errors to its caller: reads fall back
//!   to the provided default, writes become logged no-ops.
//! - Backends report failures as `StorageError`; they never panic.

use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Storage is disabled or not reachable.
    Unavailable(String),
    /// Write would exceed the backend's byte budget.
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::QuotaExceeded { key, needed, limit } => write!(
                f,
                "storage quota exceeded writing `{key}`: needs {needed} bytes, limit {limit}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Raw string-keyed storage backend.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    fn clear(&self) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}

/// Failure-tolerant JSON facade over a backend.
#[derive(Debug, Clone)]
pub struct Storage<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads and decodes `key`.
    ///
    /// Returns `default` when the key is absent, the backend fails, or the
    /// stored text does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                error!(
                    "event=storage_read module=storage status=error key={} error={}",
                    key, err
                );
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=storage_read module=storage status=error key={} error_code=malformed_json error={}",
                    key, err
                );
                default
            }
        }
    }

    /// Encodes and writes `value`. Returns whether the write landed.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=storage_write module=storage status=error key={} error_code=encode_failed error={}",
                    key, err
                );
                return false;
            }
        };

        match self.backend.set(key, &encoded) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=storage_write module=storage status=error key={} bytes={} error={}",
                    key,
                    encoded.len(),
                    err
                );
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=storage_remove module=storage status=error key={} error={}",
                    key, err
                );
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.backend.clear() {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=storage_clear module=storage status=error error={}",
                    err
                );
                false
            }
        }
    }
}
