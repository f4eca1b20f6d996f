//! Store configuration.

use chrono::Duration;
use serde::Deserialize;

/// Storage key holding the serialized collection.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";
/// Debounce quiet interval for persistence writes.
pub const DEFAULT_PERSIST_DELAY_MS: u64 = 500;

/// Per-session store settings.
///
/// Deserializable so hosts can embed it in their own config files; missing
/// fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
    pub persist_delay_ms: u64,
}

impl StoreConfig {
    /// Quiet interval before a write, capped at the largest span chrono
    /// can represent.
    pub fn persist_delay(&self) -> Duration {
        i64::try_from(self.persist_delay_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_delay_ms: DEFAULT_PERSIST_DELAY_MS,
        }
    }
}
