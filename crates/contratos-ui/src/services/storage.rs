//! Local-storage backed [`KeyValueStore`].

use crate::core::error::UiError;
use crate::core::storage::{KeyValueStore, load_json};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), UiError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| UiError::Storage(format!("{key}: {err:?}")))
    }

    fn delete(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// Decode `key`, logging and discarding a corrupt blob.
pub(crate) fn load_or_default<T: DeserializeOwned + Default>(key: &str) -> T {
    match load_json(&BrowserStore, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            log_storage_error("load", key, &err.to_string());
            T::default()
        }
    }
}

pub(crate) fn log_storage_error(operation: &'static str, key: &str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
