//! Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. All mutations go
//! through [`reduce`], a pure function of the current state and one
//! [`Action`].

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{FormField, Note};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, PartialEq, Store)]
pub struct AppState {
    /// Notes, locally created ones most recent first
    pub notes: Vec<Note>,
    /// True until the first list request settles
    pub loading: bool,
    /// Set when the initial load fails
    pub error: bool,
    /// New-note form
    pub form: FormState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            loading: true,
            error: false,
            form: FormState::default(),
        }
    }
}

impl AppState {
    pub fn completed_count(&self) -> usize {
        self.notes.iter().filter(|note| note.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.notes.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct FormState {
    pub name: String,
    pub description: String,
}

impl FormState {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Description => &self.description,
        }
    }

    fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Description => self.description = value,
        }
    }

    /// First required field that is still empty
    pub fn missing_field(&self) -> Option<FormField> {
        FormField::ALL.into_iter().find(|field| self.value(*field).is_empty())
    }
}

/// Named state transitions
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Replace the notes and finish loading
    SetNotes(Vec<Note>),
    /// Initial load failed
    Error,
    /// Prepend a note
    AddNote(Note),
    ResetForm,
    SetInput { field: FormField, value: String },
    /// Append "!" to the name of the note with this id
    AddExclamation { id: String },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetNotes(_) => "SET_NOTES",
            Action::Error => "ERROR",
            Action::AddNote(_) => "ADD_NOTE",
            Action::ResetForm => "RESET_FORM",
            Action::SetInput { .. } => "SET_INPUT",
            Action::AddExclamation { .. } => "ADD_EXCLAMATION",
        }
    }
}

pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::SetNotes(notes) => {
            next.notes = notes;
            next.loading = false;
        }
        Action::Error => {
            next.loading = false;
            next.error = true;
        }
        Action::AddNote(note) => {
            next.notes.insert(0, note);
        }
        Action::ResetForm => {
            next.form = FormState::default();
        }
        Action::SetInput { field, value } => {
            next.form.set_field(field, value);
        }
        Action::AddExclamation { id } => {
            for note in next.notes.iter_mut().filter(|note| note.id == id) {
                note.name.push('!');
            }
        }
    }
    next
}

/// Where actions are sent.
///
/// The UI dispatches into the reactive store; tests dispatch into a plain
/// cell.
pub trait Dispatch {
    fn dispatch(&self, action: Action);

    /// Current state, without subscribing to it
    fn snapshot(&self) -> AppState;
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

impl Dispatch for AppStore {
    fn dispatch(&self, action: Action) {
        tracing::debug!(action = action.name(), "dispatch");
        self.update(|state| *state = reduce(state, action));
    }

    fn snapshot(&self) -> AppState {
        self.get_untracked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, name: &str) -> Note {
        Note {
            id: id.to_string(),
            name: name.to_string(),
            description: "d".to_string(),
            completed: false,
            client_id: "someone".to_string(),
        }
    }

    fn loaded(notes: Vec<Note>) -> AppState {
        reduce(&AppState::default(), Action::SetNotes(notes))
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert!(state.notes.is_empty());
        assert!(state.loading);
        assert!(!state.error);
        assert_eq!(state.form, FormState::default());
    }

    #[test]
    fn test_set_notes_clears_loading() {
        let state = loaded(vec![note("1", "A")]);
        assert_eq!(state.notes, vec![note("1", "A")]);
        assert!(!state.loading);
        assert!(!state.error);
    }

    #[test]
    fn test_error_from_any_state() {
        let before = [
            AppState::default(),
            loaded(vec![note("1", "A")]),
            reduce(&AppState::default(), Action::Error),
        ];
        for state in before {
            let after = reduce(&state, Action::Error);
            assert!(!after.loading);
            assert!(after.error);
            assert_eq!(after.notes, state.notes);
        }
    }

    #[test]
    fn test_add_note_prepends() {
        let state = loaded(vec![note("1", "A"), note("2", "B")]);
        let after = reduce(&state, Action::AddNote(note("3", "C")));
        assert_eq!(after.notes.len(), state.notes.len() + 1);
        assert_eq!(after.notes[0], note("3", "C"));
        assert_eq!(&after.notes[1..], &state.notes[..]);
    }

    #[test]
    fn test_set_input_last_value_wins() {
        let inputs = [
            (FormField::Name, "a"),
            (FormField::Description, "x"),
            (FormField::Name, "ab"),
            (FormField::Name, "abc"),
        ];
        let mut state = AppState::default();
        for (field, value) in inputs {
            let before = state.clone();
            state = reduce(&state, Action::SetInput { field, value: value.to_string() });
            assert_eq!(state.form.value(field), value);
            for other in FormField::ALL.into_iter().filter(|f| *f != field) {
                assert_eq!(state.form.value(other), before.form.value(other));
            }
        }
        assert_eq!(state.form.name, "abc");
        assert_eq!(state.form.description, "x");
    }

    #[test]
    fn test_reset_form() {
        let state = reduce(
            &AppState::default(),
            Action::SetInput { field: FormField::Name, value: "n".to_string() },
        );
        let after = reduce(&state, Action::ResetForm);
        assert_eq!(after.form, FormState::default());
        assert_eq!(after.loading, state.loading);
    }

    #[test]
    fn test_add_exclamation_targets_one_note() {
        let state = loaded(vec![note("1", "A"), note("2", "A"), note("3", "C")]);
        let after = reduce(&state, Action::AddExclamation { id: "2".to_string() });

        assert_eq!(after.notes.len(), 3);
        assert_eq!(after.notes[0].name, "A");
        assert_eq!(after.notes[1].name, "A!");
        assert_eq!(after.notes[2].name, "C");
        let changed = after.notes.iter().zip(&state.notes).filter(|(a, b)| a != b).count();
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_add_exclamation_unknown_id_is_noop() {
        let state = loaded(vec![note("1", "A")]);
        let after = reduce(&state, Action::AddExclamation { id: "missing".to_string() });
        assert_eq!(after, state);
    }

    #[test]
    fn test_missing_field() {
        let mut form = FormState::default();
        assert_eq!(form.missing_field(), Some(FormField::Name));
        form.name = "n".to_string();
        assert_eq!(form.missing_field(), Some(FormField::Description));
        form.description = "d".to_string();
        assert_eq!(form.missing_field(), None);
    }

    #[test]
    fn test_counts() {
        let mut state = loaded(vec![note("1", "A"), note("2", "B")]);
        state.notes[1].completed = true;
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.total_count(), 2);
    }
}
