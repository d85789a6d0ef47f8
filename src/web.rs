//! Browser host: exports the Run / Reset / Next / Previous actions and paces the
//! session with `setTimeout`.
//!
//! Drawing stays on the JS side; the page subscribes with `setListener` and
//! receives JSON events carrying a fresh [`Snapshot`](crate::session::Snapshot).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::GameConfig;
use crate::interpreter::RunOutcome;
use crate::session::{RunTicket, Session, Snapshot, Tick};

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HostEvent<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    snapshot: Snapshot,
}

struct Host {
    session: Session,
    /// `setTimeout` handle of the scheduled resumption, if any.
    pending: Option<i32>,
    listener: Option<Function>,
}

impl Host {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Some(w) = window() {
                w.clear_timeout_with_handle(handle);
            }
        }
    }
}

#[wasm_bindgen]
pub struct MazeGame {
    inner: Rc<RefCell<Host>>,
}

#[wasm_bindgen]
impl MazeGame {
    /// `config_json` is an optional partial [`GameConfig`] override.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MazeGame, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(to_js)?,
            None => GameConfig::default(),
        };
        let session = Session::new(config).map_err(to_js)?;
        Ok(MazeGame {
            inner: Rc::new(RefCell::new(Host { session, pending: None, listener: None })),
        })
    }

    #[wasm_bindgen(js_name = setListener)]
    pub fn set_listener(&self, listener: Function) {
        self.inner.borrow_mut().listener = Some(listener);
    }

    /// Start the editor's program from a fresh reset. The first step runs now.
    pub fn run(&self, program_json: &str) -> Result<(), JsValue> {
        let started = {
            let mut host = self.inner.borrow_mut();
            host.cancel_pending();
            host.session.run(program_json)
        };
        match started {
            Ok(ticket) => {
                resume(&self.inner, ticket);
                Ok(())
            }
            Err(e) => {
                emit(&self.inner, "error", Some(e.to_string()));
                Err(to_js(e))
            }
        }
    }

    pub fn reset(&self) {
        {
            let mut host = self.inner.borrow_mut();
            host.cancel_pending();
            host.session.reset();
        }
        emit(&self.inner, "reset", None);
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&self) -> Result<(), JsValue> {
        let changed = {
            let mut host = self.inner.borrow_mut();
            host.cancel_pending();
            host.session.next_level().map(|_| ()).map_err(to_js)
        };
        changed?;
        emit(&self.inner, "levelChanged", None);
        Ok(())
    }

    #[wasm_bindgen(js_name = previousLevel)]
    pub fn previous_level(&self) -> Result<(), JsValue> {
        let changed = {
            let mut host = self.inner.borrow_mut();
            host.cancel_pending();
            host.session.previous_level().map(|_| ()).map_err(to_js)
        };
        changed?;
        emit(&self.inner, "levelChanged", None);
        Ok(())
    }

    /// Current board state as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().session.snapshot()).map_err(to_js)
    }
}

fn resume(inner: &Rc<RefCell<Host>>, ticket: RunTicket) {
    let result = inner.borrow_mut().session.tick(ticket);
    match result {
        Ok(Tick::Stale) => {}
        Ok(Tick::Continue { ticket, delay_ms }) => {
            inner.borrow_mut().pending = None;
            emit(inner, "step", None);
            schedule(inner, ticket, delay_ms);
        }
        Ok(Tick::Finished(outcome)) => {
            inner.borrow_mut().pending = None;
            let kind = match outcome {
                RunOutcome::GoalReached => "goalReached",
                RunOutcome::OutOfMoves => "outOfMoves",
                RunOutcome::StepLimitReached => "stepLimitReached",
            };
            emit(inner, kind, None);
        }
        Err(e) => {
            inner.borrow_mut().pending = None;
            emit(inner, "error", Some(e.to_string()));
        }
    }
}

fn schedule(inner: &Rc<RefCell<Host>>, ticket: RunTicket, delay_ms: u32) {
    let Some(win) = window() else {
        warn!("no window; run paused");
        return;
    };
    let weak: Weak<RefCell<Host>> = Rc::downgrade(inner);
    let callback = Closure::once_into_js(move || {
        if let Some(inner) = weak.upgrade() {
            resume(&inner, ticket);
        }
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    match win.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay) {
        Ok(handle) => inner.borrow_mut().pending = Some(handle),
        Err(e) => warn!(error = ?e, "setTimeout failed; run paused"),
    }
}

/// Send an event to the listener, or fall back to `alert` for user-facing notices.
/// No `RefCell` borrow is held while JS runs, so listeners may call back in.
fn emit(inner: &Rc<RefCell<Host>>, kind: &str, message: Option<String>) {
    let (listener, payload) = {
        let host = inner.borrow();
        let event = HostEvent { kind, message: message.clone(), snapshot: host.session.snapshot() };
        (host.listener.clone(), serde_json::to_string(&event))
    };
    let payload = match payload {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "could not serialize host event");
            return;
        }
    };
    if let Some(listener) = listener {
        if let Err(e) = listener.call1(&JsValue::NULL, &JsValue::from_str(&payload)) {
            warn!(error = ?e, kind, "listener threw");
        }
        return;
    }
    let notice = match kind {
        "goalReached" => "🎉 Congratulations! Goal Reached!".to_string(),
        "outOfMoves" => "No more moves. The goal was not reached.".to_string(),
        "stepLimitReached" => "Stopped: too many steps without reaching the goal.".to_string(),
        "error" => format!("Error executing blocks! {}", message.unwrap_or_default()),
        _ => return,
    };
    if let Some(w) = window() {
        if let Err(e) = w.alert_with_message(&notice) {
            warn!(error = ?e, kind, "alert failed");
        }
    }
}
