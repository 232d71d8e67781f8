//! Live Notes Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod error;
mod gateway;
mod models;
mod session;
mod store;
mod sync;

use app::App;
use leptos::prelude::*;
use session::SessionId;

/// Log lines kept in memory for the error banner
const LOG_CAPACITY: usize = rolling_logger::DEFAULT_CAPACITY;

fn console_sink(line: &str) {
    web_sys::console::log_1(&line.into());
}

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = rolling_logger::init_logger("LiveNotes", LOG_CAPACITY, console_sink) {
        web_sys::console::error_1(&format!("logger init failed: {}", err).into());
    }

    let session = SessionId::generate();
    tracing::info!(session = %session, "session started");
    mount_to_body(move || view! { <App session=session /> });
}
