//! Reports over a history blob exported from the browser.
//!
//! Backs the `workbench-inspect` binary; kept in the library so the
//! formatting and file handling are unit tested.

use std::fs;
use std::path::Path;

use crate::error::{HistoryError, WorkbenchError};
use crate::history::ModelHistory;
use crate::model::{self, ModelKind, TargetType};

/// Read and parse a history JSON file.
pub fn read_history(path: &Path) -> Result<ModelHistory, WorkbenchError> {
    let raw = fs::read_to_string(path).map_err(|source| WorkbenchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(ModelHistory::from_json(&raw)?)
}

/// One line per model run, oldest first.
pub fn runs_report(history: &ModelHistory) -> String {
    let mut out = String::new();
    for run in &history.models {
        out.push_str(&format!(
            "{:<15} {:<24} {:<16} {}\n",
            run.id,
            run.timestamp,
            run.model_type,
            run.csv_name.as_deref().unwrap_or("-")
        ));
    }
    out
}

/// One line per stored CSV; the current one is starred.
pub fn csvs_report(history: &ModelHistory) -> String {
    let current = history.current_csv.as_ref().map(|c| c.id);
    let mut out = String::new();
    for csv in &history.csvs {
        let mark = if Some(csv.id) == current { '*' } else { ' ' };
        out.push_str(&format!(
            "{mark} {:<15} {:<24} {} ({} bytes)\n",
            csv.id,
            csv.timestamp,
            csv.file_name,
            csv.data.len()
        ));
    }
    out
}

/// Raw text of a stored CSV.
pub fn csv_text(history: &ModelHistory, id: u64) -> Result<&str, WorkbenchError> {
    history
        .find_csv(id)
        .map(|c| c.data.as_str())
        .ok_or(WorkbenchError::History(HistoryError::UnknownCsv(id)))
}

/// Write `text` to `path`, creating missing parent directories.
pub fn write_output(path: &Path, text: &str) -> Result<(), WorkbenchError> {
    let io_err = |source| WorkbenchError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)
}

/// Whether `model` may run under `target`, as a sentence.
pub fn check_report(model: &str, target: &str) -> Result<String, WorkbenchError> {
    let model: ModelKind = model
        .parse()
        .map_err(|_| WorkbenchError::UnknownModel(model.to_string()))?;
    let target: TargetType = target
        .parse()
        .map_err(|_| WorkbenchError::UnknownTargetType(target.to_string()))?;
    let verdict = if model::button_enabled(model, target) {
        "supports"
    } else {
        "does not support"
    };
    let supported: Vec<&str> = model.supported().iter().map(|t| t.as_str()).collect();
    Ok(format!(
        "{} {verdict} {target} (supported: {})",
        model.id(),
        supported.join(", ")
    ))
}
