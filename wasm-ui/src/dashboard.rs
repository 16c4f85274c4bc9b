//! Dashboard page: workflow counters and entry points.

use std::rc::Rc;

use ml_workbench::{Page, WorkbenchConfig};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::backend;
use crate::state::{Action, SessionHandle};

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub session: SessionHandle,
    pub config: Rc<WorkbenchConfig>,
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &DashboardProps) -> Html {
    let stats = use_state(|| None::<String>);

    {
        let stats = stats.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let text = match backend::workflow_stats(&config).await {
                    Ok(s) => s.to_string(),
                    Err(e) => {
                        log::warn!("workflow statistics: {e}");
                        "Error loading stats".to_string()
                    }
                };
                stats.set(Some(text));
            });
        });
    }

    let open = |page: Page| {
        let session = props.session.clone();
        Callback::from(move |_: MouseEvent| session.dispatch(Action::Open(page)))
    };

    let history = &props.session.session().history;

    html! {
        <section id="dashboard-section" class="page">
            <h2>{ "Dashboard" }</h2>
            <div class="cards">
                <div class="card">
                    <h3>{ "Completed Workflows" }</h3>
                    <p id="workflow-stats" class="card-value">
                        { stats.as_deref().unwrap_or("...") }
                    </p>
                </div>
                <div class="card">
                    <h3>{ "Model Runs" }</h3>
                    <p class="card-value">{ history.models.len().to_string() }</p>
                </div>
                <div class="card">
                    <h3>{ "Uploaded Files" }</h3>
                    <p class="card-value">{ history.csvs.len().to_string() }</p>
                </div>
            </div>
            <div class="quick-actions">
                <button onclick={open(Page::Workflow)}>{ "Start New Workflow" }</button>
                <button onclick={open(Page::Plots)}>{ "Explore Plots" }</button>
                <button onclick={open(Page::History)}>{ "View History" }</button>
            </div>
        </section>
    }
}
