//! Settings page: theme, account e-mail, session reset.

use std::rc::Rc;

use ml_workbench::api::UpdateEmailRequest;
use ml_workbench::theme::THEME_INPUT_NAME;
use ml_workbench::{Theme, WorkbenchConfig};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::state::{Action, SessionHandle};
use crate::{backend, dom};

#[derive(Properties, PartialEq)]
pub struct SettingsProps {
    pub session: SessionHandle,
    pub config: Rc<WorkbenchConfig>,
}

#[function_component(SettingsPage)]
pub fn settings_page(props: &SettingsProps) -> Html {
    let theme = use_state(dom::current_theme);
    let email = use_state(String::new);
    let editing = use_state(|| false);
    let draft = use_state(String::new);

    let on_theme = {
        let theme = theme.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match input.value().parse::<Theme>() {
                Ok(picked) => {
                    dom::apply_theme(picked);
                    theme.set(picked);
                }
                Err(e) => log::warn!("{e}"),
            }
        })
    };

    let on_edit = {
        let (editing, draft, email) = (editing.clone(), draft.clone(), email.clone());
        Callback::from(move |_: MouseEvent| {
            draft.set((*email).clone());
            editing.set(true);
        })
    };

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let on_cancel = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(false))
    };

    let on_save = {
        let (editing, draft, email) = (editing.clone(), draft.clone(), email.clone());
        let config = props.config.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(request) = UpdateEmailRequest::new(&draft) else {
                dom::alert("Please enter a valid email address");
                return;
            };
            let (editing, email, config) = (editing.clone(), email.clone(), config.clone());
            spawn_local(async move {
                match backend::update_email(&config, &request).await {
                    Ok(()) => {
                        email.set(request.email);
                        editing.set(false);
                        dom::alert("Email updated successfully!");
                    }
                    Err(e) => {
                        log::error!("email update failed: {e}");
                        dom::alert("Failed to update email. Please try again.");
                    }
                }
            });
        })
    };

    let on_reset = {
        let session = props.session.clone();
        Callback::from(move |_: MouseEvent| session.dispatch(Action::Reset))
    };

    html! {
        <section id="settings-section" class="page">
            <h2>{ "Settings" }</h2>

            <fieldset class="theme-switcher">
                <legend>{ "Theme" }</legend>
                { for Theme::ALL.iter().map(|t| html! {
                    <label>
                        <input
                            type="radio"
                            name={THEME_INPUT_NAME}
                            value={t.as_str()}
                            checked={*theme == *t}
                            onchange={on_theme.clone()}
                        />
                        { t.label() }
                    </label>
                }) }
            </fieldset>

            <fieldset class="account">
                <legend>{ "Account" }</legend>
                if *editing {
                    <input type="email" value={(*draft).clone()} oninput={on_draft} />
                    <button onclick={on_save}>{ "Save" }</button>
                    <button onclick={on_cancel}>{ "Cancel" }</button>
                } else {
                    <span class="email">
                        { if email.is_empty() { "No email set" } else { email.as_str() } }
                    </span>
                    <button onclick={on_edit}>{ "Edit" }</button>
                }
            </fieldset>

            <fieldset class="session">
                <legend>{ "Session" }</legend>
                <p class="hint">{ "Forget the current dataset and choices. History is kept." }</p>
                <button onclick={on_reset}>{ "Reset Session" }</button>
            </fieldset>
        </section>
    }
}
