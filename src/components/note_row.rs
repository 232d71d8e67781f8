//! Note Row Component
//!
//! One note with its delete / complete / exclamation actions.

use leptos::prelude::*;

use crate::context::use_notes_context;
use crate::models::Note;
use crate::sync;

fn title(note: &Note) -> String {
    if note.completed {
        format!("{} (completed)", note.name)
    } else {
        note.name.clone()
    }
}

fn toggle_label(completed: bool) -> &'static str {
    if completed {
        "Mark incomplete"
    } else {
        "Mark complete"
    }
}

#[component]
pub fn NoteRow(note: Note) -> impl IntoView {
    let ctx = use_notes_context();
    let store = ctx.store;
    let id = StoredValue::new(note.id.clone());

    let on_delete = move |_| {
        let id = id.get_value();
        if sync::stage_delete(&store, &id) {
            ctx.spawn_remote("delete", move |gateway| async move {
                sync::push_delete(gateway.as_ref(), &id).await;
            });
        }
    };

    let on_toggle = move |_| {
        let id = id.get_value();
        if let Some(completed) = sync::stage_toggle(&store, &id) {
            ctx.spawn_remote("update", move |gateway| async move {
                sync::push_completion(gateway.as_ref(), &id, completed).await;
            });
        }
    };

    let on_exclaim = move |_| id.with_value(|id| sync::add_exclamation(&store, id));

    view! {
        <li class=if note.completed { "note-row completed" } else { "note-row" }>
            <div class="note-meta">
                <h4 class="note-title">{title(&note)}</h4>
                <p class="note-description">{note.description.clone()}</p>
            </div>
            <ul class="note-actions">
                <li><a class="note-action" on:click=on_delete>"Delete"</a></li>
                <li><a class="note-action" on:click=on_toggle>{toggle_label(note.completed)}</a></li>
                <li><a class="note-action" on:click=on_exclaim>"+ !"</a></li>
            </ul>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(completed: bool) -> Note {
        Note {
            id: "1".to_string(),
            name: "A".to_string(),
            description: "d".to_string(),
            completed,
            client_id: String::new(),
        }
    }

    #[test]
    fn test_title_marks_completion() {
        assert_eq!(title(&note(false)), "A");
        assert_eq!(title(&note(true)), "A (completed)");
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(toggle_label(false), "Mark complete");
        assert_eq!(toggle_label(true), "Mark incomplete");
    }
}
