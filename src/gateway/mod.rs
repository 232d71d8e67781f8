//! Sync Gateway
//!
//! Remote note operations and the live creation channel, behind
//! [`NoteGateway`]. [`AppSyncGateway`] speaks GraphQL to a managed AppSync
//! API: queries and mutations over `fetch`, subscriptions over the AppSync
//! realtime WebSocket.

mod appsync;
mod documents;
mod http;
mod realtime;
mod socket;
mod wire;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::models::Note;

pub use appsync::AppSyncGateway;
pub(crate) use http::get_json;

/// Callback for notes pushed by the creation channel
pub type OnNote = Box<dyn Fn(Note)>;

/// Remote note collection
///
/// Futures are `!Send`; everything runs on the browser's single thread.
#[async_trait(?Send)]
pub trait NoteGateway {
    /// Full note collection
    async fn list_notes(&self) -> GatewayResult<Vec<Note>>;

    /// Persist a note built locally (id and client id included)
    async fn create_note(&self, note: &Note) -> GatewayResult<Note>;

    /// Set the completion flag of one note
    async fn update_note(&self, id: &str, completed: bool) -> GatewayResult<Note>;

    async fn delete_note(&self, id: &str) -> GatewayResult<()>;

    /// Open the push channel for newly created notes.
    ///
    /// Every creation is delivered, this session's own included. Delivery
    /// stops once the returned handle is cancelled or dropped.
    fn subscribe_creations(&self, on_note: OnNote) -> GatewayResult<Subscription>;
}

/// Handle to an open push channel
///
/// The channel is released exactly once: by [`Subscription::cancel`], or on
/// drop if it was never cancelled.
#[must_use = "dropping a Subscription closes the channel"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn cancel(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
