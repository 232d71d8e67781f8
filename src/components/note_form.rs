//! New Note Form Component
//!
//! Name and description inputs plus the create button.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::use_notes_context;
use crate::models::FormField;
use crate::store::{Action, AppStateStoreFields, Dispatch};
use crate::sync;

const VALIDATION_PROMPT: &str = "please enter a name and description";

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Form for creating notes
#[component]
pub fn NoteForm() -> impl IntoView {
    let ctx = use_notes_context();
    let store = ctx.store;

    // Dispatch by the input's `name`; unknown names are ignored
    let on_input = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(field) = FormField::from_name(&input.name()) {
            store.dispatch(Action::SetInput { field, value: input.value() });
        }
    };

    let create_note = move |_| match sync::stage_note(ctx.session, &store) {
        Ok(note) => ctx.spawn_remote("create", move |gateway| async move {
            sync::push_note(gateway.as_ref(), &note).await;
        }),
        Err(err) => {
            tracing::info!(error = %err, "note creation blocked");
            alert(VALIDATION_PROMPT);
        }
    };

    view! {
        <div class="note-form">
            {FormField::ALL.into_iter().map(move |field| {
                view! {
                    <input
                        type="text"
                        class="note-input"
                        name=field.as_str()
                        placeholder=field.placeholder()
                        prop:value=move || store.form().read().value(field).to_string()
                        on:input=on_input
                    />
                }
            }).collect_view()}
            <button class="primary-btn" on:click=create_note>"Create Note"</button>
        </div>
    }
}
