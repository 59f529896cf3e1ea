//! Application core — pure domain logic, zero I/O.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
