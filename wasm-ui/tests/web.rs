//! Browser tests: `wasm-pack test --headless --firefox wasm-ui`.

#![cfg(target_arch = "wasm32")]

use ml_workbench::{ModelHistory, Timestamp};
use wasm_bindgen_test::*;
use workbench_ui::storage::{load_history, persist_history};

wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "workbench-ui-test-history";

fn at(millis: u64) -> Timestamp {
    Timestamp {
        millis,
        display: "1/1/2026, 12:00:00 AM".to_string(),
    }
}

#[wasm_bindgen_test]
fn test_history_survives_local_storage() {
    let mut history = ModelHistory::default();
    history.push_csv("iris.csv", "a,b\n1,2\n".to_string(), &at(1_000));
    persist_history(KEY, &history);

    let loaded = load_history(KEY);
    assert_eq!(loaded.csvs.len(), 1);
    assert_eq!(loaded.csvs[0].file_name, "iris.csv");
}

#[wasm_bindgen_test]
fn test_empty_history_clears_key() {
    let mut history = ModelHistory::default();
    history.push_csv("x.csv", "a\n1\n".to_string(), &at(2_000));
    persist_history(KEY, &history);
    persist_history(KEY, &ModelHistory::default());

    assert!(load_history(KEY).is_empty());
}
