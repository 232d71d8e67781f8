//! UI Components
//!
//! Reusable Leptos components.

mod completion_summary;
mod note_form;
mod note_list;
mod note_row;

pub use completion_summary::CompletionSummary;
pub use note_form::NoteForm;
pub use note_list::NoteList;
pub use note_row::NoteRow;
