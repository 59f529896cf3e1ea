//! GPIO pin assignments for the doorwatch main board.
//!
//! The A3144 hall-sensor output is open-collector with an external
//! pull-up, so HIGH means no magnet (door open) and LOW means magnet
//! present (door closed).

/// Hall-effect sensor input (A3144).
pub const HALL_GPIO: i32 = 5;

/// Active buzzer output.
pub const BUZZER_GPIO: i32 = 12;

/// Connectivity status LED.
pub const STATUS_LED_GPIO: i32 = 2;
