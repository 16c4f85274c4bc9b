//! Exploration step: statistics of the uploaded dataset.

use std::rc::Rc;

use ml_workbench::session::PrepareStatus;
use ml_workbench::stats::{CorrelationTable, StatisticsView};
use ml_workbench::{PrepareCommand, WorkbenchConfig};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{Collapsible, StepButtons};
use crate::state::{Action, SessionHandle};
use crate::{backend, dom};

/// Start prepare-for-modeling unless it is running or done for this
/// dataset. Returns false when there is nothing uploaded to prepare.
pub fn prepare_for_modeling(session: &SessionHandle, config: Rc<WorkbenchConfig>) -> bool {
    let mut probe = session.session().clone();
    match probe.begin_prepare() {
        PrepareCommand::Dispatch { generation } => {
            session.dispatch(Action::BeginPrepare);
            let dispatcher = session.dispatcher();
            spawn_local(async move {
                let result = backend::clean_data(&config).await;
                if let Err(e) = &result {
                    dom::alert(&format!("Error cleaning data: {e}"));
                }
                dispatcher.dispatch(Action::PrepareFinished { generation, result });
            });
        }
        PrepareCommand::NoDataset => {
            dom::alert("Please upload a file first.");
            return false;
        }
        PrepareCommand::InFlight | PrepareCommand::AlreadyPrepared => {}
    }
    true
}

#[derive(Properties, PartialEq)]
pub struct ExplorationProps {
    pub session: SessionHandle,
    pub config: Rc<WorkbenchConfig>,
}

#[function_component(ExplorationStep)]
pub fn exploration_step(props: &ExplorationProps) -> Html {
    let on_back = {
        let session = props.session.clone();
        Callback::from(move |_: ()| session.dispatch(Action::Back))
    };

    let on_next = {
        let session = props.session.clone();
        let config = props.config.clone();
        Callback::from(move |_: ()| {
            if prepare_for_modeling(&session, config.clone()) {
                session.dispatch(Action::Next);
            }
        })
    };

    let session = props.session.session();
    let Some(dataset) = session.dataset() else {
        return html! {
            <section id="exploration-section" class="wizard-step">
                <h2>{ "Data Exploration" }</h2>
                <p class="empty">{ "Upload a dataset to see its statistics." }</p>
                <StepButtons on_back={on_back} />
            </section>
        };
    };
    let view = StatisticsView::new(&dataset.statistics);
    let busy = matches!(session.prepare_status(), PrepareStatus::InFlight { .. });

    html! {
        <section id="exploration-section" class="wizard-step">
            <h2>{ format!("Data Exploration: {}", dataset.file_name) }</h2>
            <div class="stats-summary">
                <span class="stat">{ &view.dimensions }</span>
                <span class="stat">{ format!("Duplicate rows: {}", view.duplicates) }</span>
                if let Some(target) = &view.target_column {
                    <span class="stat">{ format!("Detected target: {target}") }</span>
                }
                if let Some(task) = &view.task_type {
                    <span class="stat">{ format!("Suggested problem type: {task}") }</span>
                }
            </div>
            if let Some(err) = &view.analysis_error {
                <div class="error">{ err }</div>
            }

            <Collapsible title="Missing Values">
                <div class="null-grid">
                    { for view.null_grid.iter().map(|row| html! {
                        <div class="null-row">
                            { for row.iter().map(|cell| html! {
                                <div class="null-cell" title={cell.column.clone()}>
                                    <span class="null-name">{ &cell.label }</span>
                                    <span class="null-count">{ &cell.count }</span>
                                </div>
                            }) }
                        </div>
                    }) }
                </div>
            </Collapsible>

            <Collapsible title="Categorical Variables" open={false}>
                { for view.categories.iter().map(|cat| html! {
                    <div class="category">
                        <h4>{ &cat.column }</h4>
                        <table class="stats-table">
                            { for cat.counts.iter().map(|(value, n)| html! {
                                <tr><td>{ value }</td><td>{ n }</td></tr>
                            }) }
                        </table>
                    </div>
                }) }
            </Collapsible>

            <Collapsible title="Numerical Summary">
                <table class="stats-table">
                    <tr>
                        <th>{ "Column" }</th><th>{ "Mean" }</th>
                        <th>{ "Variance" }</th><th>{ "Std Dev" }</th>
                    </tr>
                    { for view.summary.iter().map(|row| html! {
                        <tr>
                            <td>{ &row.column }</td><td>{ &row.mean }</td>
                            <td>{ &row.variance }</td><td>{ &row.std_dev }</td>
                        </tr>
                    }) }
                </table>
            </Collapsible>

            <Collapsible title="Correlation Matrix" open={false}>
                { correlation(&view.correlation) }
            </Collapsible>

            <StepButtons
                on_back={on_back}
                on_next={on_next}
                next_label="Continue to Model Selection"
                busy={busy}
            />
        </section>
    }
}

fn correlation(table: &CorrelationTable) -> Html {
    html! {
        <table class="stats-table correlation">
            <tr>
                <th></th>
                { for table.columns.iter().map(|c| html! { <th>{ c }</th> }) }
            </tr>
            { for table.rows.iter().map(|(name, cells)| html! {
                <tr>
                    <th>{ name }</th>
                    { for cells.iter().map(|v| html! { <td>{ v }</td> }) }
                </tr>
            }) }
        </table>
    }
}
