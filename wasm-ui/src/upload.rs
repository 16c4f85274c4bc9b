//! Upload step: drop zone, client-side preview, submit.

use std::rc::Rc;

use ml_workbench::preview::{self, FileKind, FilePreview, PickCounter, PreviewBody};
use ml_workbench::WorkbenchConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, FileReader, HtmlInputElement};
use yew::prelude::*;

use crate::state::{Action, SessionHandle};
use crate::{backend, dom, sheet};

const UPLOAD_FAILED: &str = "Upload failed. Please try again.";

/// Read `file` and hand the reader's result to `on_load`.
fn read_file<F>(file: &File, as_text: bool, on_load: F) -> Result<(), JsValue>
where
    F: FnOnce(JsValue) + 'static,
{
    let reader = FileReader::new()?;
    let reader_clone = reader.clone();
    let mut on_load = Some(on_load);

    let onload = Closure::wrap(Box::new(move |_: web_sys::Event| {
        if let (Ok(result), Some(on_load)) = (reader_clone.result(), on_load.take()) {
            on_load(result);
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    if as_text {
        reader.read_as_text(file)
    } else {
        reader.read_as_array_buffer(file)
    }
}

#[derive(Properties, PartialEq)]
pub struct UploadProps {
    pub session: SessionHandle,
    pub config: Rc<WorkbenchConfig>,
}

/// Raw text of a CSV pick, read at submit time so it always belongs to the
/// file being uploaded. Other formats record nothing.
async fn csv_text_of(file: &File) -> Option<String> {
    if FileKind::from_mime(&file.type_()) != Some(FileKind::Csv) {
        return None;
    }
    let handle = gloo::file::File::from(file.clone());
    match gloo::file::futures::read_as_text(&handle).await {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("could not read {} for history: {e}", file.name());
            None
        }
    }
}

#[function_component(UploadStep)]
pub fn upload_step(props: &UploadProps) -> Html {
    let file = use_state(|| None::<File>);
    let preview = use_state(|| None::<FilePreview>);
    let picks = use_mut_ref(PickCounter::default);
    let drag_over = use_state(|| false);
    let uploading = use_state(|| false);

    // Picker and drop zone both end up here.
    let on_file = {
        let file = file.clone();
        let preview = preview.clone();
        let config = props.config.clone();
        Callback::from(move |picked: File| {
            preview.set(None);
            let tag = picks.borrow_mut().begin();
            let name = picked.name();
            let size = preview::size_label(picked.size());
            let kind = FileKind::from_mime(&picked.type_());
            log::debug!("selected {name} ({size}), kind {kind:?}");

            let read = match kind {
                Some(FileKind::Csv) => {
                    let preview = preview.clone();
                    let picks = picks.clone();
                    let max_lines = config.preview_lines;
                    read_file(&picked, true, move |result| {
                        if !picks.borrow().is_current(tag) {
                            return;
                        }
                        let Some(text) = result.as_string() else {
                            return;
                        };
                        preview.set(Some(FilePreview {
                            file_name: name,
                            size,
                            body: preview::text_preview(&text, max_lines),
                        }));
                    })
                }
                Some(FileKind::Xls | FileKind::Xlsx) => {
                    let preview = preview.clone();
                    let picks = picks.clone();
                    let max_rows = config.preview_rows;
                    read_file(&picked, false, move |result| {
                        if !picks.borrow().is_current(tag) {
                            return;
                        }
                        let bytes = js_sys::Uint8Array::new(&result);
                        match sheet::first_sheet_rows(&bytes) {
                            Ok(rows) => preview.set(Some(FilePreview {
                                file_name: name,
                                size,
                                body: preview::grid_preview(rows, max_rows),
                            })),
                            Err(e) => log::warn!("excel preview failed: {e:?}"),
                        }
                    })
                }
                None => Ok(()),
            };
            if let Err(e) = read {
                log::warn!("could not read file: {e:?}");
            }
            file.set(Some(picked));
        })
    };

    let on_change = {
        let on_file = on_file.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(picked) = input.files().and_then(|files| files.get(0)) {
                on_file.emit(picked);
            }
        })
    };

    let on_drag_over = {
        let drag_over = drag_over.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            drag_over.set(true);
        })
    };

    let on_drag_leave = {
        let drag_over = drag_over.clone();
        Callback::from(move |_: DragEvent| drag_over.set(false))
    };

    let on_drop = {
        let drag_over = drag_over.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            drag_over.set(false);
            if let Some(picked) = e
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0))
            {
                on_file.emit(picked);
            }
        })
    };

    let on_submit = {
        let file = file.clone();
        let uploading = uploading.clone();
        let dispatcher = props.session.dispatcher();
        let config = props.config.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(picked) = (*file).clone() else {
                dom::alert("Please select a file first.");
                return;
            };
            let uploading = uploading.clone();
            let dispatcher = dispatcher.clone();
            let config = config.clone();
            uploading.set(true);
            spawn_local(async move {
                match backend::upload(&config, &picked).await {
                    Ok(statistics) => dispatcher.dispatch(Action::Uploaded {
                        file_name: picked.name(),
                        statistics,
                        csv_text: csv_text_of(&picked).await,
                        at: dom::now(),
                    }),
                    Err(e) => {
                        log::error!("upload failed: {e}");
                        dom::alert(UPLOAD_FAILED);
                    }
                }
                uploading.set(false);
            });
        })
    };

    let label = match &*file {
        Some(f) => preview::selected_label(&f.name()),
        None => "Drag and drop a CSV or Excel file here, or click to browse".to_string(),
    };

    html! {
        <section id="upload-section" class="wizard-step">
            <h2>{ "Upload Dataset" }</h2>
            <form class="upload-form" onsubmit={on_submit}>
                <label
                    class={classes!("drop-zone", (*drag_over).then_some("drag-over"))}
                    ondragover={on_drag_over}
                    ondragleave={on_drag_leave}
                    ondrop={on_drop}
                >
                    <span class="drop-label">{ label }</span>
                    <input type="file" name="file" accept=".csv,.xls,.xlsx" onchange={on_change} />
                </label>
                if let Some(p) = &*preview {
                    { render_preview(p) }
                }
                <button type="submit" class="upload-button" disabled={*uploading}>
                    { if *uploading { "Uploading..." } else { "Upload" } }
                </button>
            </form>
        </section>
    }
}

fn render_preview(p: &FilePreview) -> Html {
    let body = match &p.body {
        PreviewBody::Text { text, truncated } => html! {
            <>
                <pre class="preview-text">{ text }</pre>
                if *truncated { <p class="hint">{ "..." }</p> }
            </>
        },
        PreviewBody::Grid { rows, truncated } => html! {
            <>
                <table class="preview-table">
                    { for rows.iter().enumerate().map(|(i, row)| html! {
                        <tr>
                            { for row.iter().map(|cell| if i == 0 {
                                html! { <th>{ cell }</th> }
                            } else {
                                html! { <td>{ cell }</td> }
                            }) }
                        </tr>
                    }) }
                </table>
                if *truncated { <p class="hint">{ "..." }</p> }
            </>
        },
    };
    html! {
        <div class="file-preview">
            <div class="preview-header">
                <span class="preview-name">{ &p.file_name }</span>
                <span class="preview-size">{ &p.size }</span>
            </div>
            { body }
        </div>
    }
}
