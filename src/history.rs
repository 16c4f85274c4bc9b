//! Run and upload history, mirrored into browser local storage.
//!
//! The history is append-only. Entries are only ever dropped by clearing
//! it, and [`sync`] then removes the stored blob. The blob
//! layout (`models`, `csvs`, `currentCSV`, camelCase entry fields) matches
//! what earlier versions of the page wrote, so existing browsers keep
//! their history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HistoryError;
use crate::model::ModelKind;

/// Wall-clock reading supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// Milliseconds since the Unix epoch.
    pub millis: u64,
    /// Locale-formatted text shown in the history list.
    pub display: String,
}

/// One successful model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRun {
    pub id: u64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub results: Map<String, Value>,
    #[serde(default)]
    pub csv_name: Option<String>,
}

/// One uploaded CSV, raw text included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvEntry {
    pub id: u64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub data: String,
}

/// The persisted blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelHistory {
    #[serde(default)]
    pub models: Vec<ModelRun>,
    #[serde(default)]
    pub csvs: Vec<CsvEntry>,
    #[serde(default, rename = "currentCSV")]
    pub current_csv: Option<CsvEntry>,
}

impl ModelHistory {
    pub fn from_json(raw: &str) -> Result<Self, HistoryError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.csvs.is_empty()
    }

    /// Next entry id: the clock reading, bumped past every existing id so
    /// two writes within one millisecond stay distinct and ordered.
    fn next_id(&self, millis: u64) -> u64 {
        let last = self
            .models
            .iter()
            .map(|m| m.id)
            .chain(self.csvs.iter().map(|c| c.id))
            .max();
        match last {
            Some(last) if last >= millis => last + 1,
            _ => millis,
        }
    }

    /// Append a model run.
    pub fn push_run(
        &mut self,
        model: ModelKind,
        results: Map<String, Value>,
        csv_name: Option<String>,
        at: &Timestamp,
    ) -> &ModelRun {
        let run = ModelRun {
            id: self.next_id(at.millis),
            timestamp: at.display.clone(),
            model_type: model.id().to_string(),
            results,
            csv_name,
        };
        self.models.push(run);
        &self.models[self.models.len() - 1]
    }

    /// Append an uploaded CSV and make it the current one.
    pub fn push_csv(&mut self, file_name: &str, data: String, at: &Timestamp) -> &CsvEntry {
        let entry = CsvEntry {
            id: self.next_id(at.millis),
            timestamp: at.display.clone(),
            file_name: file_name.to_string(),
            data,
        };
        self.current_csv = Some(entry.clone());
        self.csvs.push(entry);
        &self.csvs[self.csvs.len() - 1]
    }

    pub fn find_run(&self, id: u64) -> Option<&ModelRun> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn find_csv(&self, id: u64) -> Option<&CsvEntry> {
        self.csvs.iter().find(|c| c.id == id)
    }
}

/// Key-value persistence seam; local storage in the browser, a map in tests.
pub trait HistoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, HistoryError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), HistoryError>;
    fn remove(&mut self, key: &str) -> Result<(), HistoryError>;
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one key.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), HistoryError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), HistoryError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read the history blob. A missing key is an empty history; so is a blob
/// that no longer parses, which is logged and overwritten by the next save.
pub fn load<S: HistoryStorage + ?Sized>(storage: &S, key: &str) -> ModelHistory {
    match storage.read(key) {
        Ok(Some(raw)) => ModelHistory::from_json(&raw).unwrap_or_else(|e| {
            log::warn!("discarding unreadable history blob: {e}");
            ModelHistory::default()
        }),
        Ok(None) => ModelHistory::default(),
        Err(e) => {
            log::warn!("history storage unavailable: {e}");
            ModelHistory::default()
        }
    }
}

/// Write the whole blob.
pub fn save<S: HistoryStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    history: &ModelHistory,
) -> Result<(), HistoryError> {
    storage.write(key, &history.to_json()?)
}

/// Mirror `history` to storage. An empty history removes the key, so a
/// cleared history and a fresh browser look the same.
pub fn sync<S: HistoryStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    history: &ModelHistory,
) -> Result<(), HistoryError> {
    if history.is_empty() && history.current_csv.is_none() {
        storage.remove(key)
    } else {
        save(storage, key, history)
    }
}
