//! Doorwatch firmware library.
//!
//! Monitors a magnetic door/lock sensor, reports confirmed transitions to
//! an MQTT broker and answers remote `BEEP`/`STOP` commands with a
//! non-blocking buzzer sequencer.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod net;
pub mod sensors;

mod pins;

// Platform adapters; the actual device implementations are guarded by
// cfg attributes inside.
pub mod adapters;
