//! Web UI for the ML workbench
//!
//! A Yew-based single page application: upload a dataset, explore its
//! statistics, pick a target and model, and inspect the results. Session
//! rules live in the `ml-workbench` crate; this crate owns the DOM, the
//! backend calls and browser storage.

mod app;
mod backend;
mod charts;
mod components;
mod custom_table;
mod dashboard;
mod dom;
mod history;
mod plots;
mod results;
mod selection;
mod settings;
mod sheet;
mod state;
mod statistics;
pub mod storage;
mod upload;

use wasm_bindgen::prelude::*;

/// Entry point for the WASM application.
#[wasm_bindgen(start)]
pub fn run_app() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(e) = console_log::init_with_level(level) {
        gloo::console::error!(format!("logger: {e}"));
    }
    console_error_panic_hook::set_once();

    yew::Renderer::<app::App>::new().render();
}
