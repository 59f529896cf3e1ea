//! Log-based event sink adapter.
//!
//! Default [`EventSink`]: every domain event goes to the serial log via
//! the `log` facade. Connectivity regressions log at `warn`, the rest at
//! `info`.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::net::link::LinkStatus;
use crate::net::session::SessionStatus;

pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => info!("event: started, door {state:?}"),
            AppEvent::DoorChanged { from, to } => info!("event: door {from:?} -> {to:?}"),
            AppEvent::Published { state, ok: true } => {
                info!("event: published {}", state.payload());
            }
            AppEvent::Published { state, ok: false } => {
                warn!("event: publish of {} dropped (best-effort)", state.payload());
            }
            AppEvent::LinkStatus(LinkStatus::Up) => info!("event: link up"),
            AppEvent::LinkStatus(s) => warn!("event: link {s:?}"),
            AppEvent::SessionStatus(SessionStatus::Up) => info!("event: session up"),
            AppEvent::SessionStatus(s) => warn!("event: session {s:?}"),
            AppEvent::AlertStarted { times, duration_ms } => {
                info!("event: alert {times} x {duration_ms}ms");
            }
            AppEvent::AlertStopped => info!("event: alert stopped"),
        }
    }
}
