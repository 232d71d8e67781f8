//! Note Reconciliation
//!
//! Mutations are optimistic: the local change is dispatched first, then the
//! remote call is made. A failed remote call is logged and nothing is rolled
//! back, so local and remote state may diverge until the next reload. There
//! are no retries.
//!
//! Each mutation is split into a synchronous `stage_*` step (local state) and
//! an async `push_*` step (remote call), so the UI can reflect the change
//! before any request is in flight.

use crate::error::{GatewayResult, SyncError};
use crate::gateway::{NoteGateway, Subscription};
use crate::models::Note;
use crate::session::{self, SessionId};
use crate::store::{Action, Dispatch};

/// Drops pushed notes created by this session; they were already added
/// optimistically.
#[derive(Debug, Clone, Copy)]
pub struct EchoFilter {
    session: SessionId,
}

impl EchoFilter {
    pub fn new(session: SessionId) -> Self {
        Self { session }
    }

    pub fn admit(&self, note: Note) -> Option<Note> {
        if self.session.owns(&note.client_id) {
            tracing::debug!(note_id = %note.id, "own creation echoed back, suppressed");
            None
        } else {
            Some(note)
        }
    }
}

/// Route one pushed note into the store.
///
/// A note whose id is already listed (loaded and then pushed late) is not
/// added again, so ids stay unique in the list.
pub fn apply_pushed(filter: &EchoFilter, store: &impl Dispatch, note: Note) {
    let Some(note) = filter.admit(note) else {
        return;
    };
    if store.snapshot().notes.iter().any(|known| known.id == note.id) {
        tracing::debug!(note_id = %note.id, "pushed note already listed");
        return;
    }
    tracing::info!(note_id = %note.id, "note created elsewhere");
    store.dispatch(Action::AddNote(note));
}

/// Load the whole collection, replacing local notes
pub async fn fetch_all(gateway: &dyn NoteGateway, store: &impl Dispatch) {
    match gateway.list_notes().await {
        Ok(notes) => {
            tracing::info!(count = notes.len(), "notes loaded");
            store.dispatch(Action::SetNotes(notes));
        }
        Err(err) => {
            tracing::error!(error = %err, "loading notes failed");
            store.dispatch(Action::Error);
        }
    }
}

/// Open the creation channel, feeding admitted notes into `store`
pub fn subscribe_creations<D>(gateway: &dyn NoteGateway, filter: EchoFilter, store: D) -> GatewayResult<Subscription>
where
    D: Dispatch + 'static,
{
    gateway.subscribe_creations(Box::new(move |note| apply_pushed(&filter, &store, note)))
}

/// Validate the form, then add the new note locally and clear the form.
///
/// Returns the note to send to the backend. An incomplete form dispatches
/// nothing.
pub fn stage_note(session: SessionId, store: &impl Dispatch) -> Result<Note, SyncError> {
    let form = store.snapshot().form;
    if let Some(field) = form.missing_field() {
        return Err(SyncError::Validation { field });
    }
    let note = Note {
        id: session::new_id(),
        name: form.name,
        description: form.description,
        completed: false,
        client_id: session.to_string(),
    };
    store.dispatch(Action::AddNote(note.clone()));
    store.dispatch(Action::ResetForm);
    Ok(note)
}

pub async fn push_note(gateway: &dyn NoteGateway, note: &Note) {
    if let Err(err) = gateway.create_note(note).await {
        tracing::warn!(note_id = %note.id, error = %err, "remote create failed, local note kept");
    }
}

/// Remove the note locally. False when no note has this id.
pub fn stage_delete(store: &impl Dispatch, id: &str) -> bool {
    let notes = store.snapshot().notes;
    if !notes.iter().any(|note| note.id == id) {
        return false;
    }
    let remaining = notes.into_iter().filter(|note| note.id != id).collect();
    store.dispatch(Action::SetNotes(remaining));
    true
}

pub async fn push_delete(gateway: &dyn NoteGateway, id: &str) {
    if let Err(err) = gateway.delete_note(id).await {
        tracing::warn!(note_id = %id, error = %err, "remote delete failed, note stays removed locally");
    }
}

/// Flip the completion flag locally. Returns the new value, or `None` when
/// no note has this id.
pub fn stage_toggle(store: &impl Dispatch, id: &str) -> Option<bool> {
    let mut notes = store.snapshot().notes;
    let note = notes.iter_mut().find(|note| note.id == id)?;
    note.completed = !note.completed;
    let completed = note.completed;
    store.dispatch(Action::SetNotes(notes));
    Some(completed)
}

pub async fn push_completion(gateway: &dyn NoteGateway, id: &str, completed: bool) {
    if let Err(err) = gateway.update_note(id, completed).await {
        tracing::warn!(note_id = %id, completed, error = %err, "remote update failed, local flag kept");
    }
}

/// Local only; never sent to the backend
pub fn add_exclamation(store: &impl Dispatch, id: &str) {
    store.dispatch(Action::AddExclamation { id: id.to_string() });
}
