//! Unified error types for the doorwatch firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! and allocation-free.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
/// A failed sensor read is deliberately not an error: the monitor sees
/// it as "no observation" (`Option`), never as a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A connectivity operation failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// A link-layer connect attempt could not be started.
    LinkConnectFailed,
    /// A session connect attempt could not be started.
    SessionConnectFailed,
    /// The pub/sub session is not established; the message was dropped
    /// without touching the transport (best-effort policy).
    SessionDown,
    /// The transport rejected a publish.
    PublishFailed,
    /// The transport rejected a subscribe.
    SubscribeFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkConnectFailed => write!(f, "link connect failed"),
            Self::SessionConnectFailed => write!(f, "session connect failed"),
            Self::SessionDown => write!(f, "session down"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
