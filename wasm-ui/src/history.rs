//! History page: stored CSV uploads and past model runs.

use yew::prelude::*;

use crate::dom;
use crate::state::{Action, SessionHandle};

#[derive(Properties, PartialEq)]
pub struct HistoryProps {
    pub session: SessionHandle,
}

#[function_component(HistoryPage)]
pub fn history_page(props: &HistoryProps) -> Html {
    let history = &props.session.session().history;

    let on_download = {
        let session = props.session.clone();
        Callback::from(move |id: u64| {
            let Some(csv) = session.session().history.find_csv(id) else {
                log::warn!("no stored csv {id}");
                return;
            };
            if let Err(e) = dom::download_text(&csv.file_name, &csv.data, "text/csv") {
                log::error!("download failed: {e:?}");
            }
        })
    };

    let on_view = {
        let session = props.session.clone();
        Callback::from(move |id: u64| session.dispatch(Action::ViewRun(id)))
    };

    let on_clear = {
        let session = props.session.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Clear all saved history?") {
                session.dispatch(Action::ClearHistory);
            }
        })
    };

    let current = history.current_csv.as_ref().map(|c| c.id);

    html! {
        <section id="history-section" class="page">
            <div class="page-header">
                <h2>{ "History" }</h2>
                <button class="danger" onclick={on_clear} disabled={history.is_empty()}>
                    { "Clear History" }
                </button>
            </div>

            <h3>{ "Uploaded CSV Files" }</h3>
            <ul id="csv-history" class="history-list">
                { for history.csvs.iter().rev().map(|csv| {
                    let id = csv.id;
                    let on_download = on_download.clone();
                    html! {
                        <li class={classes!("history-item", (current == Some(id)).then_some("current"))}>
                            <span class="history-name">{ &csv.file_name }</span>
                            <span class="history-time">{ &csv.timestamp }</span>
                            <button onclick={Callback::from(move |_: MouseEvent| on_download.emit(id))}>
                                { "Download" }
                            </button>
                        </li>
                    }
                }) }
            </ul>

            <h3>{ "Model Runs" }</h3>
            <ul id="model-history" class="history-list">
                { for history.models.iter().rev().map(|run| {
                    let id = run.id;
                    let on_view = on_view.clone();
                    html! {
                        <li class="history-item">
                            <span class="history-name">{ &run.model_type }</span>
                            <span class="history-csv">{ run.csv_name.as_deref().unwrap_or("-") }</span>
                            <span class="history-time">{ &run.timestamp }</span>
                            <button onclick={Callback::from(move |_: MouseEvent| on_view.emit(id))}>
                                { "View Results" }
                            </button>
                        </li>
                    }
                }) }
            </ul>
        </section>
    }
}
