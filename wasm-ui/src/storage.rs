//! Browser local storage behind the history storage seam.

use gloo::storage::{LocalStorage, Storage};
use ml_workbench::history::{self, HistoryStorage};
use ml_workbench::{HistoryError, ModelHistory};
use wasm_bindgen::JsValue;

fn storage_err(e: JsValue) -> HistoryError {
    HistoryError::Storage(format!("{e:?}"))
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl HistoryStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        LocalStorage::raw().get_item(key).map_err(storage_err)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), HistoryError> {
        LocalStorage::raw().set_item(key, value).map_err(storage_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), HistoryError> {
        LocalStorage::raw().remove_item(key).map_err(storage_err)
    }
}

/// History stored under `key`, or an empty one.
pub fn load_history(key: &str) -> ModelHistory {
    history::load(&BrowserStorage, key)
}

/// Mirror `history` to local storage.
pub fn persist_history(key: &str, history: &ModelHistory) {
    if let Err(e) = history::sync(&mut BrowserStorage, key, history) {
        log::error!("saving history failed: {e}");
    }
}
