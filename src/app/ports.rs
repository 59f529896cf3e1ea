//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (GPIO, WiFi link, MQTT session, event sinks) implement
//! these traits. The [`AppService`](super::service::AppService) consumes them
//! via generics, so the domain core never touches hardware or sockets
//! directly.
//!
//! ## Contract notes
//!
//! - No port method may block on network I/O. Connect operations only
//!   *start* an attempt; completion is observed through `is_up()`.
//! - `SessionPort::poll_message` drains a bounded mailbox filled from the
//!   client's receive callback — the callback itself does minimal work.

use crate::error::CommsError;

/// Maximum inbound payload the command mailbox accepts. Command tokens are
/// a handful of bytes; anything longer is truncated by the adapter and
/// ignored by the dispatcher.
pub const MAX_PAYLOAD: usize = 64;

/// Raw inbound payload handed from the session adapter to the dispatcher.
pub type MessagePayload = heapless::Vec<u8, MAX_PAYLOAD>;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this each tick to sample the door
/// sensor.
pub trait SensorPort {
    /// Raw hall-sensor level. HIGH (`true`) = no magnet = door open,
    /// LOW (`false`) = magnet present = door closed.
    ///
    /// `None` means the read failed; the debounce monitor treats that as
    /// "no observation", never as a fault.
    fn read_door_level(&mut self) -> Option<bool>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain mirrors the alert sequencer and the
/// connectivity status onto these outputs every tick.
pub trait ActuatorPort {
    /// Drive the buzzer output.
    fn set_buzzer(&mut self, on: bool);

    /// Drive the connectivity status LED.
    fn set_status_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain → lower network layer)
// ───────────────────────────────────────────────────────────────

/// Black-box lower connectivity layer (association + address acquisition).
///
/// The supervisor drives reconnects through this port; the association
/// procedure itself is out of scope and lives entirely in the adapter.
pub trait LinkPort {
    /// Begin (or re-begin) a connect attempt. Must not block; progress is
    /// observed via [`is_up`](LinkPort::is_up).
    fn start_connect(&mut self) -> Result<(), CommsError>;

    /// Whether the link is associated *and* has an address.
    fn is_up(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Session port (driven adapter: domain → pub/sub client)
// ───────────────────────────────────────────────────────────────

/// Black-box publish/subscribe client session running atop the link.
pub trait SessionPort {
    /// Begin (or re-begin) a session connect attempt. Must not block.
    fn start_connect(&mut self) -> Result<(), CommsError>;

    /// Whether the session is currently established.
    fn is_up(&self) -> bool;

    /// Publish a payload. Only called while the supervisor believes the
    /// session is up; may still fail if the transport disagrees.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;

    /// Subscribe to a topic. Called on *every* transition to up —
    /// subscriptions are never assumed durable across reconnects.
    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError>;

    /// Drain one inbound command-topic message, if any is waiting.
    fn poll_message(&mut self) -> Option<MessagePayload>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, test
/// capture, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
