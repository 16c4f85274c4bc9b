//! Shared UI components.

use yew::prelude::*;

/// A titled section whose body can be folded away.
#[derive(Properties, PartialEq)]
pub struct CollapsibleProps {
    pub title: AttrValue,
    #[prop_or(true)]
    pub open: bool,
    pub children: Children,
}

#[function_component(Collapsible)]
pub fn collapsible(props: &CollapsibleProps) -> Html {
    let open = use_state(|| props.open);

    let on_toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };

    html! {
        <div class={classes!("collapsible", (*open).then_some("open"))}>
            <button class="collapsible-header" onclick={on_toggle}>
                <span class="collapsible-icon">{ if *open { "\u{25BE}" } else { "\u{25B8}" } }</span>
                { &props.title }
            </button>
            if *open {
                <div class="collapsible-body">{ for props.children.iter() }</div>
            }
        </div>
    }
}

/// Blocking confirm/cancel dialog.
#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
    pub title: AttrValue,
    pub message: AttrValue,
    #[prop_or(AttrValue::Static("Continue"))]
    pub confirm_label: AttrValue,
    pub on_answer: Callback<bool>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let answer = |value: bool| {
        let on_answer = props.on_answer.clone();
        Callback::from(move |_: MouseEvent| on_answer.emit(value))
    };

    html! {
        <div class="modal-overlay" onclick={answer(false)}>
            <div class="modal-dialog" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <h3 class="modal-title">{ &props.title }</h3>
                <div class="modal-content">
                    <p class="modal-description">{ &props.message }</p>
                </div>
                <div class="modal-buttons">
                    <button class="modal-button cancel" onclick={answer(false)}>
                        { "Cancel" }
                    </button>
                    <button class="modal-button next" onclick={answer(true)}>
                        { &props.confirm_label }
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Previous/next controls at the bottom of a wizard step.
#[derive(Properties, PartialEq)]
pub struct StepButtonsProps {
    #[prop_or_default]
    pub on_back: Option<Callback<()>>,
    #[prop_or_default]
    pub on_next: Option<Callback<()>>,
    #[prop_or(AttrValue::Static("Next"))]
    pub next_label: AttrValue,
    #[prop_or_default]
    pub busy: bool,
}

#[function_component(StepButtons)]
pub fn step_buttons(props: &StepButtonsProps) -> Html {
    let emit = |cb: &Option<Callback<()>>| {
        let cb = cb.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(cb) = &cb {
                cb.emit(());
            }
        })
    };

    html! {
        <div class="step-buttons">
            if props.on_back.is_some() {
                <button class="back-button" onclick={emit(&props.on_back)}>{ "Back" }</button>
            }
            if props.on_next.is_some() {
                <button class="next-button" disabled={props.busy} onclick={emit(&props.on_next)}>
                    { if props.busy { "Working..." } else { props.next_label.as_str() } }
                </button>
            }
        </div>
    }
}
