//! Realtime Creation Channel
//!
//! Browser WebSocket carrying the `onCreateNote` subscription. The returned
//! [`Subscription`] stops the registration, closes the socket and frees the
//! JS callbacks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::documents::ON_CREATE_NOTE;
use super::realtime::{self, ClientMessage, Reaction};
use super::{OnNote, Subscription};
use crate::config::ApiConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::session;

struct Channel {
    socket: WebSocket,
    /// Registration id of our `start`
    id: String,
    start: String,
    on_note: OnNote,
    keep_alive_ms: Cell<u32>,
    watchdog: RefCell<Option<Timeout>>,
}

impl Channel {
    fn send(&self, text: &str) {
        if let Err(err) = self.socket.send_with_str(text) {
            tracing::warn!(error = ?err, "realtime send failed");
        }
    }

    /// (Re)start the keep-alive deadline; replacing the old timer cancels it
    fn arm_watchdog(&self) {
        let timeout_ms = self.keep_alive_ms.get();
        let socket = self.socket.clone();
        let timeout = Timeout::new(timeout_ms, move || {
            tracing::warn!(timeout_ms, "realtime keep-alive lapsed, closing channel");
            let _ = socket.close();
        });
        self.watchdog.replace(Some(timeout));
    }

    fn handle(&self, text: &str) {
        match realtime::react(&self.id, text) {
            Reaction::Register { keep_alive_ms } => {
                self.keep_alive_ms.set(keep_alive_ms);
                self.arm_watchdog();
                self.send(&self.start);
            }
            Reaction::Deliver(note) => (self.on_note)(note),
            Reaction::KeepAlive => self.arm_watchdog(),
            Reaction::Ignore => {}
        }
    }
}

pub(crate) fn open_creation_channel(config: &ApiConfig, on_note: OnNote) -> GatewayResult<Subscription> {
    let url = realtime::connect_url(config)?;
    let id = session::new_id();
    let init = ClientMessage::ConnectionInit.to_json()?;
    let start = ClientMessage::start(&id, &ON_CREATE_NOTE, config)?.to_json()?;
    let stop = ClientMessage::Stop { id: &id }.to_json()?;

    let socket = WebSocket::new_with_str(&url, realtime::SUBPROTOCOL)
        .map_err(|err| GatewayError::Subscription(format!("{:?}", err)))?;

    let channel = Rc::new(Channel {
        socket: socket.clone(),
        id,
        start,
        on_note,
        keep_alive_ms: Cell::new(realtime::DEFAULT_CONNECTION_TIMEOUT_MS),
        watchdog: RefCell::new(None),
    });

    let onopen = Closure::<dyn FnMut()>::new({
        let channel = channel.clone();
        move || {
            tracing::debug!("realtime socket open");
            channel.send(&init);
        }
    });
    let onmessage = Closure::<dyn FnMut(MessageEvent)>::new({
        let channel = channel.clone();
        move |event: MessageEvent| match event.data().as_string() {
            Some(text) => channel.handle(&text),
            None => tracing::warn!("non-text realtime frame ignored"),
        }
    });
    let onclose = Closure::<dyn FnMut(CloseEvent)>::new(|event: CloseEvent| {
        tracing::info!(code = event.code(), reason = %event.reason(), "realtime socket closed");
    });
    let onerror = Closure::<dyn FnMut(web_sys::Event)>::new(|_event: web_sys::Event| {
        tracing::warn!("realtime socket error");
    });

    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    Ok(Subscription::new(move || {
        channel.watchdog.borrow_mut().take();
        if socket.ready_state() == WebSocket::OPEN {
            channel.send(&stop);
        }
        socket.set_onopen(None);
        socket.set_onmessage(None);
        socket.set_onclose(None);
        socket.set_onerror(None);
        if let Err(err) = socket.close() {
            tracing::warn!(error = ?err, "realtime socket close failed");
        }
        drop((onopen, onmessage, onclose, onerror));
        tracing::info!("creation channel released");
    }))
}
