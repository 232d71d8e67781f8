//! In-memory gateway for tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;

use super::{NoteGateway, OnNote, Subscription};
use crate::error::{GatewayError, GatewayResult};
use crate::models::Note;

#[derive(Default)]
pub struct FakeGateway {
    pub remote: RefCell<Vec<Note>>,
    pub fail: Cell<bool>,
    calls: RefCell<Vec<String>>,
    subscriber: Rc<RefCell<Option<OnNote>>>,
    pub releases: Rc<Cell<u32>>,
}

impl FakeGateway {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            remote: RefCell::new(notes),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail.set(true);
        gateway
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Simulate a server push; false when nobody is subscribed
    pub fn push(&self, note: Note) -> bool {
        match self.subscriber.borrow().as_ref() {
            Some(on_note) => {
                on_note(note);
                true
            }
            None => false,
        }
    }

    fn record(&self, call: String) -> GatewayResult<()> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            Err(GatewayError::Transport("offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl NoteGateway for FakeGateway {
    async fn list_notes(&self) -> GatewayResult<Vec<Note>> {
        self.record("list".to_string())?;
        Ok(self.remote.borrow().clone())
    }

    async fn create_note(&self, note: &Note) -> GatewayResult<Note> {
        self.record(format!("create {}", note.id))?;
        self.remote.borrow_mut().push(note.clone());
        Ok(note.clone())
    }

    async fn update_note(&self, id: &str, completed: bool) -> GatewayResult<Note> {
        self.record(format!("update {id} {completed}"))?;
        let mut remote = self.remote.borrow_mut();
        let note = remote
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(GatewayError::MissingData("updateNote"))?;
        note.completed = completed;
        Ok(note.clone())
    }

    async fn delete_note(&self, id: &str) -> GatewayResult<()> {
        self.record(format!("delete {id}"))?;
        self.remote.borrow_mut().retain(|note| note.id != id);
        Ok(())
    }

    fn subscribe_creations(&self, on_note: OnNote) -> GatewayResult<Subscription> {
        self.record("subscribe".to_string())?;
        *self.subscriber.borrow_mut() = Some(on_note);
        let slot = self.subscriber.clone();
        let releases = self.releases.clone();
        Ok(Subscription::new(move || {
            slot.borrow_mut().take();
            releases.set(releases.get() + 1);
        }))
    }
}
