//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to               |
//! |------------|--------------------|---------------------------|
//! | `hardware` | SensorPort         | ESP32 GPIO (hall sensor)  |
//! |            | ActuatorPort       | ESP32 GPIO (buzzer, LED)  |
//! | `log_sink` | EventSink          | Serial log output         |
//! | `mqtt`     | SessionPort        | ESP-IDF MQTT client       |
//! | `time`     | —                  | ESP32 system timer        |
//! | `wifi`     | LinkPort           | ESP-IDF WiFi STA          |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
