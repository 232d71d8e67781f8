//! Application Context
//!
//! Per-session values provided via Leptos Context API.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::gateway::NoteGateway;
use crate::session::SessionId;
use crate::store::AppStore;
use crate::sync::EchoFilter;

/// Session-wide handles shared by all components
#[derive(Clone, Copy)]
pub struct NotesContext {
    pub store: AppStore,
    pub session: SessionId,
    /// Set once the backend configuration has loaded
    gateway: StoredValue<Option<Rc<dyn NoteGateway>>, LocalStorage>,
}

impl NotesContext {
    pub fn new(store: AppStore, session: SessionId) -> Self {
        Self {
            store,
            session,
            gateway: StoredValue::new_local(None),
        }
    }

    pub fn attach_gateway(&self, gateway: Rc<dyn NoteGateway>) {
        self.gateway.set_value(Some(gateway));
    }

    pub fn echo_filter(&self) -> EchoFilter {
        EchoFilter::new(self.session)
    }

    /// Run the remote half of an operation in the background.
    ///
    /// The local half has already been applied; without a gateway the remote
    /// call is skipped and logged like any other remote failure.
    pub fn spawn_remote<F, Fut>(&self, operation: &'static str, job: F)
    where
        F: FnOnce(Rc<dyn NoteGateway>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        match self.gateway.get_value() {
            Some(gateway) => spawn_local(job(gateway)),
            None => tracing::warn!(operation, "backend not configured, remote call skipped"),
        }
    }
}

/// Get the notes context
pub fn use_notes_context() -> NotesContext {
    expect_context::<NotesContext>()
}
