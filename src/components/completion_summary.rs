//! Completion Summary Component

use leptos::prelude::*;

use crate::context::use_notes_context;

/// "N completed / M total"
#[component]
pub fn CompletionSummary() -> impl IntoView {
    let store = use_notes_context().store;

    view! {
        <h4 class="completion-summary">
            {move || {
                let state = store.read();
                format!("{} completed / {} total", state.completed_count(), state.total_count())
            }}
        </h4>
    }
}
