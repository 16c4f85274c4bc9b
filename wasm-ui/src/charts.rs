//! Plotly interop and the chart component.
//!
//! Plotly is loaded by the page as a global. Specs come from
//! `ml_workbench::plot` as JSON and are converted to plain JS objects.

use ml_workbench::ChartSpec;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use yew::prelude::*;

fn plotly_fn(name: &str) -> Result<js_sys::Function, JsValue> {
    let plotly = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("Plotly"))?;
    if plotly.is_undefined() {
        return Err(JsValue::from_str("Plotly is not loaded"));
    }
    js_sys::Reflect::get(&plotly, &JsValue::from_str(name))?.dyn_into::<js_sys::Function>()
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// Remove any chart drawn in `target`.
pub fn purge(target: &HtmlElement) -> Result<(), JsValue> {
    plotly_fn("purge")?.call1(&JsValue::NULL, target)?;
    Ok(())
}

/// Replace whatever `target` shows with `spec`.
pub fn draw(target: &HtmlElement, spec: &ChartSpec) -> Result<(), JsValue> {
    purge(target)?;
    let traces = to_js(&spec.traces)?;
    let layout = to_js(&spec.layout)?;
    plotly_fn("newPlot")?.call3(&JsValue::NULL, target, &traces, &layout)?;
    Ok(())
}

#[derive(Properties, PartialEq)]
pub struct ChartProps {
    pub spec: Option<ChartSpec>,
    #[prop_or_default]
    pub class: Classes,
}

/// A div that Plotly draws `spec` into; an empty spec clears it.
#[function_component(Chart)]
pub fn chart(props: &ChartProps) -> Html {
    let node = use_node_ref();

    {
        let node = node.clone();
        use_effect_with(props.spec.clone(), move |spec| {
            if let Some(target) = node.cast::<HtmlElement>() {
                let result = match spec {
                    Some(spec) => draw(&target, spec),
                    None => purge(&target),
                };
                if let Err(e) = result {
                    log::error!("chart rendering failed: {e:?}");
                }
            }
        });
    }

    html! {
        <div class={classes!("chart", props.class.clone())} ref={node}></div>
    }
}
