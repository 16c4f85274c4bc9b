//! Plots page: pick variables and a plot type, draw the backend's series.

use std::rc::Rc;

use ml_workbench::{ChartSpec, PlotKind, PlotRequest, WorkbenchConfig};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::charts::Chart;
use crate::state::SessionHandle;
use crate::{backend, dom};

#[derive(Clone, PartialEq)]
enum Variables {
    Loading,
    Loaded(Vec<String>),
    Failed,
}

#[derive(Properties, PartialEq)]
pub struct PlotsProps {
    pub session: SessionHandle,
    pub config: Rc<WorkbenchConfig>,
}

fn select_value(e: &Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}

#[function_component(PlotsPage)]
pub fn plots_page(props: &PlotsProps) -> Html {
    let variables = use_state(|| Variables::Loading);
    let plot_type = use_state(String::new);
    let x = use_state(String::new);
    let y = use_state(String::new);
    let spec = use_state(|| None::<ChartSpec>);

    // Refetch whenever a new dataset is uploaded.
    let generation = props.session.session().dataset().map(|d| d.generation);
    {
        let variables = variables.clone();
        let config = props.config.clone();
        use_effect_with(generation, move |_| {
            variables.set(Variables::Loading);
            spawn_local(async move {
                match backend::variables(&config).await {
                    Ok(names) => variables.set(Variables::Loaded(names)),
                    Err(e) => {
                        log::warn!("loading variables failed: {e}");
                        variables.set(Variables::Failed);
                    }
                }
            });
        });
    }

    let on_plot_type = {
        let plot_type = plot_type.clone();
        Callback::from(move |e: Event| plot_type.set(select_value(&e)))
    };
    let on_x = {
        let x = x.clone();
        Callback::from(move |e: Event| x.set(select_value(&e)))
    };
    let on_y = {
        let y = y.clone();
        Callback::from(move |e: Event| y.set(select_value(&e)))
    };

    let on_generate = {
        let (plot_type, x, y, spec) = (plot_type.clone(), x.clone(), y.clone(), spec.clone());
        let config = props.config.clone();
        Callback::from(move |_: MouseEvent| {
            let request = match PlotRequest::from_selection(&plot_type, &x, &y) {
                Ok(request) => request,
                Err(e) => {
                    dom::alert(&e.to_string());
                    return;
                }
            };
            let spec = spec.clone();
            let config = config.clone();
            spec.set(None);
            spawn_local(async move {
                match backend::plot_data(&config, &request).await {
                    Ok(data) => spec.set(Some(request.chart(&data))),
                    Err(e) => dom::alert(&e.to_string()),
                }
            });
        })
    };

    let options = |placeholder: &'static str| match &*variables {
        Variables::Loading => html! { <option value="">{ placeholder }</option> },
        Variables::Failed => html! { <option value="">{ "Error loading variables" }</option> },
        Variables::Loaded(names) => html! {
            <>
                <option value="">{ placeholder }</option>
                { for names.iter().map(|n| html! { <option value={n.clone()}>{ n }</option> }) }
            </>
        },
    };

    html! {
        <section id="plots-section" class="page">
            <h2>{ "Plots" }</h2>
            <div class="plot-controls">
                <select onchange={on_plot_type}>
                    <option value="">{ "Select Plot Type" }</option>
                    { for PlotKind::ALL.iter().map(|k| html! {
                        <option value={k.as_str()}>{ k.label() }</option>
                    }) }
                </select>
                <select onchange={on_x}>{ options("Select X Variable") }</select>
                <select onchange={on_y}>{ options("Select Y Variable") }</select>
                <button onclick={on_generate}>{ "Generate Plot" }</button>
            </div>
            <Chart spec={(*spec).clone()} class="plot-chart" />
        </section>
    }
}
