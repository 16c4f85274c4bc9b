//! Results step: metrics chart and raw values of the latest run.

use ml_workbench::plot::{self, MetricsView};
use yew::prelude::*;

use crate::charts::Chart;
use crate::components::StepButtons;
use crate::state::{Action, SessionHandle};

#[derive(Properties, PartialEq)]
pub struct ResultsProps {
    pub session: SessionHandle,
}

#[function_component(ResultsStep)]
pub fn results_step(props: &ResultsProps) -> Html {
    let on_back = {
        let session = props.session.clone();
        Callback::from(move |_: ()| session.dispatch(Action::Back))
    };
    let on_restart = {
        let session = props.session.clone();
        Callback::from(move |_: ()| session.dispatch(Action::Reset))
    };

    let Some((model, results)) = props.session.session().last_results() else {
        return html! {
            <section id="results-section" class="wizard-step">
                <h2>{ "Results" }</h2>
                <p class="empty">{ "No model has been run yet." }</p>
                <StepButtons on_back={on_back} />
            </section>
        };
    };
    let view = MetricsView::new(results);
    let rows = plot::result_rows(results);

    html! {
        <section id="results-section" class="wizard-step">
            <h2>{ format!("Results: {}", model.label()) }</h2>
            if let Some(spec) = view.chart() {
                <Chart spec={Some(spec)} class="metrics-chart" />
            }
            <table class="results-table">
                { for rows.iter().map(|(key, value)| html! {
                    <tr><th>{ key }</th><td><pre>{ value }</pre></td></tr>
                }) }
            </table>
            <StepButtons on_back={on_back} on_next={on_restart} next_label="Start Over" />
        </section>
    }
}
