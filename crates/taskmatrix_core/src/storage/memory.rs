//! In-process key-value backend.
//!
//! Behaves like browser-style local storage: a flat string map with an
//! optional byte quota and a switch that makes every call fail, which is how
//! disabled storage shows up to callers. Clones share the same map.

use super::{KeyValueStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    available: bool,
    quota_bytes: Option<usize>,
    writes: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryKvStore {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                available: true,
                ..MemoryState::default()
            })),
        }
    }

    /// Limits the summed byte length of all keys and values.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let store = Self::new();
        store.lock().quota_bytes = Some(quota_bytes);
        store
    }

    /// When `false`, every trait call fails with `StorageError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Reads a value bypassing availability checks.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Seeds a value bypassing availability, quota and the write counter.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn checked(&self) -> StorageResult<MutexGuard<'_, MemoryState>> {
        let state = self.lock();
        if !state.available {
            return Err(StorageError::Unavailable(
                "in-memory storage is disabled".to_string(),
            ));
        }
        Ok(state)
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.checked()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut state = self.checked()?;
        if let Some(limit) = state.quota_bytes {
            let others: usize = state
                .entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        state.entries.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.checked()?.entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.checked()?.entries.clear();
        Ok(())
    }
}
