//! Main application component.

use std::rc::Rc;

use ml_workbench::{Page, WorkbenchConfig, WorkflowStep};
use yew::prelude::*;

use crate::custom_table::TablePage;
use crate::dashboard::DashboardPage;
use crate::history::HistoryPage;
use crate::plots::PlotsPage;
use crate::results::ResultsStep;
use crate::selection::SelectionStep;
use crate::settings::SettingsPage;
use crate::state::{Action, SessionHandle, SessionState};
use crate::statistics::{ExplorationStep, prepare_for_modeling};
use crate::upload::UploadStep;
use crate::{dom, storage};

/// Progress bar over the wizard steps.
fn step_indicator(session: &SessionHandle, config: &Rc<WorkbenchConfig>) -> Html {
    let current = session.session().nav.step();
    html! {
        <ol class="step-indicator">
            { for WorkflowStep::ALL.iter().map(|step| {
                let class = classes!(
                    "step",
                    (*step == current).then_some("active"),
                    (*step < current).then_some("done"),
                );
                let onclick = {
                    let session = session.clone();
                    let config = config.clone();
                    let step = *step;
                    Callback::from(move |_: MouseEvent| {
                        // Later steps go through the same cleaning as the
                        // exploration step's continue button.
                        if step.requires_prepared_data()
                            && !prepare_for_modeling(&session, config.clone())
                        {
                            return;
                        }
                        session.dispatch(Action::Show(step));
                    })
                };
                html! {
                    <li class={class} {onclick}>
                        <span class="step-number">{ (step.index() + 1).to_string() }</span>
                        { step.title() }
                    </li>
                }
            }) }
        </ol>
    }
}

/// Main application component.
#[function_component(App)]
pub fn app() -> Html {
    let config: Rc<WorkbenchConfig> = use_memo((), |_| dom::load_config());
    let session = {
        let key = config.history_key.clone();
        use_reducer(move || SessionState::new(storage::load_history(&key)))
    };

    // Mirror every history change to local storage.
    {
        let key = config.history_key.clone();
        use_effect_with(session.session().history.clone(), move |history| {
            storage::persist_history(&key, history);
        });
    }

    let nav = session.session().nav;
    let page = nav.page();

    let content = match page {
        Page::Dashboard => html! { <DashboardPage session={session.clone()} config={config.clone()} /> },
        Page::Workflow => {
            let step = match nav.step() {
                WorkflowStep::Upload => {
                    html! { <UploadStep session={session.clone()} config={config.clone()} /> }
                }
                WorkflowStep::Exploration => {
                    html! { <ExplorationStep session={session.clone()} config={config.clone()} /> }
                }
                WorkflowStep::Selection => {
                    html! { <SelectionStep session={session.clone()} config={config.clone()} /> }
                }
                WorkflowStep::Results => html! { <ResultsStep session={session.clone()} /> },
            };
            html! {
                <div id={page.section_id()} class="page">
                    { step_indicator(&session, &config) }
                    { step }
                </div>
            }
        }
        Page::Table => html! { <TablePage /> },
        Page::Plots => html! { <PlotsPage session={session.clone()} config={config.clone()} /> },
        Page::History => html! { <HistoryPage session={session.clone()} /> },
        Page::Settings => html! { <SettingsPage session={session.clone()} config={config.clone()} /> },
    };

    html! {
        <div class="app">
            <header class="header">
                <div class="header-left">
                    <h1>{ "ML Workbench" }</h1>
                    <p class="subtitle">{ "Upload, explore, model" }</p>
                </div>
                if let Some(dataset) = session.session().dataset() {
                    <div class="header-right">
                        <span class="current-dataset">{ &dataset.file_name }</span>
                    </div>
                }
            </header>

            <div class="layout">
                <nav class="sidebar">
                    { for Page::ALL.iter().map(|p| {
                        let session = session.clone();
                        let target = *p;
                        html! {
                            <button
                                class={classes!("nav-item", nav.is_active(target).then_some("active"))}
                                data-page={target.id()}
                                onclick={Callback::from(move |_: MouseEvent| session.dispatch(Action::Open(target)))}
                            >
                                { target.label() }
                            </button>
                        }
                    }) }
                </nav>
                <main class="main">{ content }</main>
            </div>

            <footer class="footer">
                <div class="footer-row">
                    <span class="footer-left">{ "MIT License" }</span>
                    <span class="footer-build">
                        { format!("Build: {}@{} {}", env!("BUILD_HOST"), env!("BUILD_COMMIT"), env!("BUILD_TIMESTAMP")) }
                    </span>
                </div>
            </footer>
        </div>
    }
}
