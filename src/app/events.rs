//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, count in a test, etc.

use crate::net::link::LinkStatus;
use crate::net::session::SessionStatus;
use crate::sensors::door::DoorState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial confirmed door state).
    Started(DoorState),

    /// The debounced door state changed.
    DoorChanged { from: DoorState, to: DoorState },

    /// A status publish was attempted for `state`. `ok == false` covers
    /// both "session down, dropped without a transport call" and a
    /// transport-level failure — either way the transition is not retried.
    Published { state: DoorState, ok: bool },

    /// The link supervisor changed status.
    LinkStatus(LinkStatus),

    /// The session supervisor changed status.
    SessionStatus(SessionStatus),

    /// An alert sequence was armed.
    AlertStarted { times: u16, duration_ms: u32 },

    /// The alert sequencer was silenced by a remote `STOP`.
    AlertStopped,
}
