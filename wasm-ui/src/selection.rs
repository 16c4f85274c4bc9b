//! Model selection step: target type, target feature, model buttons.

use std::rc::Rc;

use ml_workbench::api::RunModelRequest;
use ml_workbench::session::{self, FeatureList, PrepareNotice};
use ml_workbench::{ModelKind, RunDecision, TargetType, WorkbenchConfig};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::{ConfirmDialog, StepButtons};
use crate::state::{Action, SessionHandle};
use crate::statistics::prepare_for_modeling;
use crate::{backend, dom};

/// Switch target type and fetch its compatible features.
pub fn load_features(session: &SessionHandle, config: Rc<WorkbenchConfig>, target: TargetType) {
    let query = session.session().clone().select_target_type(target);
    session.dispatch(Action::SelectTarget(target));
    let dispatcher = session.dispatcher();
    spawn_local(async move {
        let result = backend::compatible_features(&config, &query.body).await;
        if let Err(e) = &result {
            log::warn!("compatible features for {target} failed: {e}");
        }
        dispatcher.dispatch(Action::FeaturesLoaded {
            seq: query.seq,
            result,
        });
    });
}

/// Post a run request; results or the failure alert follow.
fn start_run(session: &SessionHandle, config: Rc<WorkbenchConfig>, request: RunModelRequest) {
    let model = request.model;
    session.dispatch(Action::RunStarted(model));
    let dispatcher = session.dispatcher();
    spawn_local(async move {
        let result = backend::run_model(&config, &request).await;
        if let Err(e) = &result {
            log::error!("{model} failed: {e}");
            dom::alert(&session::run_failure_message(e));
        }
        dispatcher.dispatch(Action::RunFinished {
            model,
            result,
            at: dom::now(),
        });
    });
}

fn prepare_notice(notice: PrepareNotice, on_prepare: Callback<MouseEvent>) -> Html {
    match notice {
        PrepareNotice::Ready => html! {},
        PrepareNotice::NoDataset => html! {
            <p class="hint">{ "Upload a dataset before choosing a model." }</p>
        },
        PrepareNotice::Preparing => html! {
            <p class="hint">{ "Preparing data for modeling..." }</p>
        },
        PrepareNotice::NotPrepared { error } => html! {
            <div class="hint prepare">
                if let Some(error) = error {
                    <span class="error">{ format!("Error cleaning data: {error}") }</span>
                } else {
                    <span>{ "The data has not been prepared for modeling yet." }</span>
                }
                <button onclick={on_prepare}>{ "Prepare data" }</button>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectionProps {
    pub session: SessionHandle,
    pub config: Rc<WorkbenchConfig>,
}

#[function_component(SelectionStep)]
pub fn selection_step(props: &SelectionProps) -> Html {
    let generation = props.session.session().dataset().map(|d| d.generation);

    // First visit for a dataset: load features for the current target type.
    {
        let session = props.session.clone();
        let config = props.config.clone();
        use_effect_with(generation, move |generation| {
            if generation.is_some() && *session.session().features() == FeatureList::Empty {
                load_features(&session, config, session.session().target_type());
            }
        });
    }

    let on_target_change = {
        let session = props.session.clone();
        let config = props.config.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<TargetType>() {
                Ok(target) => load_features(&session, config.clone(), target),
                Err(e) => log::warn!("{e}"),
            }
        })
    };

    let on_feature_change = {
        let session = props.session.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            session.dispatch(Action::SelectFeature(select.value()));
        })
    };

    let on_model = {
        let session = props.session.clone();
        let config = props.config.clone();
        Callback::from(move |model: ModelKind| {
            let mut probe = session.session().clone();
            match probe.request_run(model) {
                RunDecision::Blocked(message) => dom::alert(&message),
                RunDecision::NeedsConfirmation { .. } => {
                    session.dispatch(Action::RequestRun(model));
                }
                RunDecision::Proceed(request) => start_run(&session, config.clone(), request),
            }
        })
    };

    let on_confirm = {
        let session = props.session.clone();
        let config = props.config.clone();
        Callback::from(move |proceed: bool| {
            let pending = session.session().clone().confirm_run(proceed);
            session.dispatch(Action::ConfirmRun(proceed));
            if let Some(request) = pending {
                start_run(&session, config.clone(), request);
            }
        })
    };

    let on_back = {
        let session = props.session.clone();
        Callback::from(move |_: ()| session.dispatch(Action::Back))
    };

    let on_prepare = {
        let session = props.session.clone();
        let config = props.config.clone();
        Callback::from(move |_: MouseEvent| {
            prepare_for_modeling(&session, config.clone());
        })
    };

    let state = props.session.session();
    let target = state.target_type();
    let running = state.running();

    let feature_options = match state.features() {
        FeatureList::Empty => html! { <option value="">{ "Select a target type first" }</option> },
        FeatureList::Loading => html! { <option value="">{ "Loading features..." }</option> },
        FeatureList::Failed(err) => html! { <option value="">{ format!("Error: {err}") }</option> },
        FeatureList::Loaded(features) => html! {
            <>
                { for features.iter().map(|f| html! {
                    <option
                        value={f.name.clone()}
                        selected={state.selected_feature() == Some(f.name.as_str())}
                    >
                        { f.label() }
                    </option>
                }) }
            </>
        },
    };

    let warning = state.run_warning();

    html! {
        <section id="selection-section" class="wizard-step">
            <h2>{ "Model Selection" }</h2>
            { prepare_notice(state.prepare_notice(), on_prepare) }

            <div class="selection-row">
                <label for="target-type">{ "Problem type" }</label>
                <select id="target-type" onchange={on_target_change}>
                    { for TargetType::ALL.iter().map(|t| html! {
                        <option value={t.as_str()} selected={*t == target}>{ t.label() }</option>
                    }) }
                </select>
                <span class="recommendation">
                    { format!("Recommended: {}", state.recommendation().unwrap_or("-")) }
                </span>
            </div>
            <p class="guidance">{ state.guidance() }</p>

            <div class="selection-row">
                <label for="target-feature">{ "Target variable" }</label>
                <select
                    id="target-feature"
                    disabled={!state.feature_selector_enabled()}
                    onchange={on_feature_change}
                >
                    { feature_options }
                </select>
            </div>

            <div class="model-grid">
                { for state.model_buttons().into_iter().map(|(model, enabled)| {
                    let on_model = on_model.clone();
                    html! {
                        <button
                            class={classes!("model-button", (running == Some(model)).then_some("running"))}
                            disabled={!enabled || running.is_some()}
                            onclick={Callback::from(move |_: MouseEvent| on_model.emit(model))}
                        >
                            { if running == Some(model) { "Running...".to_string() } else { model.label().to_string() } }
                        </button>
                    }
                }) }
            </div>

            <StepButtons on_back={on_back} />

            if let Some(message) = warning {
                <ConfirmDialog
                    title="Model not recommended"
                    message={message}
                    on_answer={on_confirm}
                />
            }
        </section>
    }
}
