//! Local-storage keys and typed JSON helpers.
//!
//! # Design
//! - Blobs are opaque JSON with no versioning; a corrupt blob is an error the
//!   caller logs and replaces with defaults.
//! - The store trait works on raw strings so it stays object-safe.

use crate::core::error::UiError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Dashboard layout and widget settings.
pub const DASHBOARD_PREFERENCES_KEY: &str = "dashboard-preferences";
/// Chat transcript mirror.
pub const CHAT_HISTORY_KEY: &str = "chat_messageHistory";
/// Chat usage counters.
pub const CHAT_STATS_KEY: &str = "chat_chatStats";

/// String key/value persistence.
pub trait KeyValueStore {
    /// Raw value for `key`.
    fn get_raw(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`.
    ///
    /// # Errors
    /// Returns [`UiError::Storage`] when the backend rejects the write.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), UiError>;
    /// Remove `key`.
    fn delete(&self, key: &str);
}

/// Decode the JSON blob under `key`.
///
/// # Errors
/// Returns [`UiError::Storage`] when the stored value is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, UiError> {
    store
        .get_raw(key)
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|err| UiError::Storage(format!("{key}: {err}")))
        })
        .transpose()
}

/// Encode `value` as JSON under `key`.
///
/// # Errors
/// Returns [`UiError::Storage`] when encoding or the write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), UiError> {
    let encoded =
        serde_json::to_string(value).map_err(|err| UiError::Storage(format!("{key}: {err}")))?;
    store.set_raw(key, &encoded)
}

/// In-memory store used off-browser.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), UiError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contratos_api_models::ChatStats;

    #[test]
    fn json_round_trips_through_store() {
        let store = MemoryStore::new();
        let stats = ChatStats {
            messages_count: 3,
            ..ChatStats::default()
        };
        save_json(&store, CHAT_STATS_KEY, &stats).expect("save");
        let loaded: Option<ChatStats> = load_json(&store, CHAT_STATS_KEY).expect("load");
        assert_eq!(loaded, Some(stats));
    }

    #[test]
    fn missing_key_is_none_and_corrupt_blob_is_error() {
        let store = MemoryStore::new();
        let missing: Option<ChatStats> = load_json(&store, CHAT_STATS_KEY).expect("load");
        assert!(missing.is_none());
        store.set_raw(CHAT_STATS_KEY, "{not json").expect("set");
        let corrupt = load_json::<ChatStats>(&store, CHAT_STATS_KEY);
        assert!(matches!(corrupt, Err(UiError::Storage(_))));
    }
}
