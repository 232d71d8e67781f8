//! Live Notes App
//!
//! Root component: loads the backend configuration, performs the initial
//! fetch, and holds the creation subscription for as long as it is mounted.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::{CompletionSummary, NoteForm, NoteList};
use crate::config::ApiConfig;
use crate::context::NotesContext;
use crate::gateway::{AppSyncGateway, NoteGateway, Subscription};
use crate::session::SessionId;
use crate::store::{Action, AppState, Dispatch};
use crate::sync;

#[component]
pub fn App(session: SessionId) -> impl IntoView {
    let store = Store::new(AppState::default());
    let ctx = NotesContext::new(store, session);
    provide_context(ctx);

    // Creation channel, released on unmount
    let subscription = StoredValue::new_local(None::<Subscription>);

    // Connect on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let config = match ApiConfig::load().await {
                Ok(config) => config,
                Err(err) => {
                    tracing::error!(error = %err, "backend configuration unavailable");
                    store.dispatch(Action::Error);
                    return;
                }
            };
            tracing::info!(
                endpoint = %config.graphql_endpoint,
                region = ?config.region,
                session = %session,
                "connecting"
            );

            let gateway: Rc<dyn NoteGateway> = Rc::new(AppSyncGateway::new(config));
            ctx.attach_gateway(gateway.clone());

            match sync::subscribe_creations(gateway.as_ref(), ctx.echo_filter(), store) {
                Ok(channel) => subscription.set_value(Some(channel)),
                Err(err) => tracing::error!(error = %err, "live updates unavailable"),
            }
            sync::fetch_all(gateway.as_ref(), &store).await;
        });
    });

    on_cleanup(move || {
        subscription.update_value(|slot| {
            if let Some(channel) = slot.take() {
                channel.cancel();
            }
        });
    });

    view! {
        <div class="app-container">
            <NoteForm />
            <hr />
            <CompletionSummary />
            <hr />
            <NoteList />
        </div>
    }
}
