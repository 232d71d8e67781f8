//! Note List Component
//!
//! Loading indicator, load-failure banner, and one row per note.

use leptos::prelude::*;

use crate::components::NoteRow;
use crate::context::use_notes_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn NoteList() -> impl IntoView {
    let store = use_notes_context().store;

    view! {
        <Show when=move || store.error().get()>
            <p class="load-error" title=move || rolling_logger::last_line()>
                "Could not load notes."
            </p>
        </Show>
        <Show
            when=move || !store.loading().get()
            fallback=|| view! { <p class="list-loading">"Loading..."</p> }
        >
            <ul class="note-list">
                <For
                    each=move || store.notes().get()
                    // Re-render a row when anything it shows changes
                    key=|note| (note.id.clone(), note.name.clone(), note.completed)
                    children=move |note| view! { <NoteRow note=note /> }
                />
            </ul>
            <Show when=move || store.notes().read().is_empty()>
                <p class="list-empty">"No notes"</p>
            </Show>
        </Show>
    }
}
