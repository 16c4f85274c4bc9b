//! SheetJS (`XLSX` global) interop for Excel preview and export.

use ml_workbench::table::SHEET_NAME;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = XLSX, js_name = read, catch)]
    fn xlsx_read(data: &JsValue, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = XLSX, js_name = writeFile, catch)]
    fn xlsx_write_file(book: &JsValue, file_name: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["XLSX", "utils"], js_name = sheet_to_json, catch)]
    fn sheet_to_json(sheet: &JsValue, options: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["XLSX", "utils"], js_name = aoa_to_sheet, catch)]
    fn aoa_to_sheet(rows: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["XLSX", "utils"], js_name = book_new, catch)]
    fn book_new() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["XLSX", "utils"], js_name = book_append_sheet, catch)]
    fn book_append_sheet(book: &JsValue, sheet: &JsValue, name: &str) -> Result<(), JsValue>;
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Rows of the first sheet of an Excel workbook, every cell as text.
pub fn first_sheet_rows(bytes: &js_sys::Uint8Array) -> Result<Vec<Vec<String>>, JsValue> {
    let book = xlsx_read(bytes, &to_js(&serde_json::json!({"type": "array"}))?)?;
    let names = js_sys::Reflect::get(&book, &JsValue::from_str("SheetNames"))?;
    let first = js_sys::Reflect::get(&names, &JsValue::from_f64(0.0))?;
    if first.is_undefined() {
        return Ok(Vec::new());
    }
    let sheets = js_sys::Reflect::get(&book, &JsValue::from_str("Sheets"))?;
    let sheet = js_sys::Reflect::get(&sheets, &first)?;
    let rows = sheet_to_json(&sheet, &to_js(&serde_json::json!({"header": 1, "defval": ""}))?)?;
    let rows: Vec<Vec<Value>> = serde_wasm_bindgen::from_value(rows)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

/// Save `grid` (header row first) as a one-sheet workbook download.
pub fn write_workbook(grid: &[Vec<String>], file_name: &str) -> Result<(), JsValue> {
    let sheet = aoa_to_sheet(&to_js(&grid)?)?;
    let book = book_new()?;
    book_append_sheet(&book, &sheet, SHEET_NAME)?;
    xlsx_write_file(&book, file_name)
}
