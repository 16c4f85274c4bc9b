//! Small helpers over the browser document.

use ml_workbench::{Theme, Timestamp, WorkbenchConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlInputElement, Url};

const API_BASE_META: &str = "workbench-api-base";

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Defaults, prefixed with the `<meta name="workbench-api-base">` value
/// when the page carries one.
pub fn load_config() -> WorkbenchConfig {
    let base = document()
        .and_then(|d| {
            d.query_selector(&format!("meta[name=\"{API_BASE_META}\"]"))
                .ok()
                .flatten()
        })
        .and_then(|meta| meta.get_attribute("content"));
    match base {
        Some(base) => {
            log::info!("api base from page: {base}");
            WorkbenchConfig::with_api_base(&base)
        }
        None => WorkbenchConfig::default(),
    }
}

/// CSRF token from the hidden form field; empty when the page has none.
pub fn csrf_token(field: &str) -> String {
    document()
        .and_then(|d| d.query_selector(&format!("[name=\"{field}\"]")).ok().flatten())
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Current time, with the locale text shown in the history list.
pub fn now() -> Timestamp {
    let date = js_sys::Date::new_0();
    Timestamp {
        millis: date.get_time() as u64,
        display: String::from(date.to_locale_string("default", &JsValue::UNDEFINED)),
    }
}

/// Offer `text` as a file download.
pub fn download_text(file_name: &str, text: &str, mime: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(text));

    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}

/// Theme currently set on `<body>`.
pub fn current_theme() -> Theme {
    let value = document()
        .and_then(|d| d.body())
        .and_then(|body| body.get_attribute(ml_workbench::theme::THEME_ATTRIBUTE));
    Theme::from_attribute(value.as_deref())
}

/// Set `data-theme` on `<body>`.
pub fn apply_theme(theme: Theme) {
    let Some(body) = document().and_then(|d| d.body()) else {
        return;
    };
    if let Err(e) = body.set_attribute(ml_workbench::theme::THEME_ATTRIBUTE, theme.as_str()) {
        log::error!("could not set theme: {e:?}");
    }
}

pub fn alert(message: &str) {
    gloo::dialogs::alert(message);
}
