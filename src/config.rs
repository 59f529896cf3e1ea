//! System configuration parameters
//!
//! All tunable parameters for the doorwatch monitor: pin assignments,
//! debounce and beep timing, pub/sub topics and connectivity cadences.
//! The core never hard-codes any of these — they are injected at
//! construction time and can be overridden before flashing.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::pins;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Pins ---
    /// GPIO for the hall-effect door sensor (input, pull-up).
    pub hall_pin: i32,
    /// GPIO for the active buzzer (output).
    pub buzzer_pin: i32,
    /// GPIO for the connectivity status LED (output).
    pub status_led_pin: i32,

    // --- Debounce ---
    /// Minimum dwell time (ms) a raw level must hold before the
    /// confirmed door state changes.
    pub debounce_window_ms: u32,

    // --- Beeps ---
    /// Beep count for the door-transition alert.
    pub default_beep_times: u16,
    /// Half-cycle duration (ms) for the door-transition alert.
    pub default_beep_duration_ms: u32,
    /// Beep count for a remote `BEEP` command.
    pub command_beep_times: u16,
    /// Half-cycle duration (ms) for a remote `BEEP` command.
    pub command_beep_duration_ms: u32,

    // --- Topics ---
    /// Outbound topic carrying `OPEN`/`CLOSED` tokens.
    pub status_topic: String<64>,
    /// Inbound topic carrying `BEEP`/`STOP` tokens.
    pub command_topic: String<64>,

    // --- WiFi / broker (externally supplied, never owned by the core) ---
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,
    pub broker_host: String<64>,
    pub broker_port: u16,
    pub broker_username: String<32>,
    pub broker_password: String<64>,
    pub client_id: String<32>,

    // --- Timing ---
    /// Main cooperative loop period (ms). Every component ticks at this
    /// cadence, so it must stay well under the shortest beep half-cycle.
    pub poll_interval_ms: u32,
    /// Link fallback: if the link is still down after this many seconds,
    /// a fresh connect burst is triggered even without a loss event.
    pub link_fallback_secs: u32,
    /// Session liveness check period (ms).
    pub session_check_interval_ms: u32,
    /// Minimum delay (ms) between session connect attempts.
    pub session_retry_min_ms: u32,
    /// Maximum delay (ms) between session connect attempts.
    pub session_retry_max_ms: u32,
    /// Session connect attempt is abandoned after this long (ms).
    pub session_connect_timeout_ms: u32,
}

fn const_str<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    // Callers only pass literals that fit N.
    let _ = out.push_str(s);
    out
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Pins
            hall_pin: pins::HALL_GPIO,
            buzzer_pin: pins::BUZZER_GPIO,
            status_led_pin: pins::STATUS_LED_GPIO,

            // Debounce
            debounce_window_ms: 100,

            // Beeps
            default_beep_times: 3,
            default_beep_duration_ms: 200,
            command_beep_times: 5,
            command_beep_duration_ms: 300,

            // Topics
            status_topic: const_str("esp32/lock/state"),
            command_topic: const_str("esp32/lock/cmd"),

            // WiFi / broker placeholders — provisioned before flashing
            wifi_ssid: const_str("YOUR_WIFI_SSID"),
            wifi_password: const_str("YOUR_WIFI_PASSWORD"),
            broker_host: const_str("YOUR_MQTT_SERVER"),
            broker_port: 1883,
            broker_username: const_str(""),
            broker_password: const_str(""),
            client_id: const_str("ESP32_DoorLock"),

            // Timing
            poll_interval_ms: 10,
            link_fallback_secs: 60,
            session_check_interval_ms: 5_000,
            session_retry_min_ms: 5_000,
            session_retry_max_ms: 10_000,
            session_connect_timeout_ms: 10_000,
        }
    }
}
