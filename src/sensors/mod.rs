//! Sensor subsystem.

pub mod door;
