//! MQTT session adapter.
//!
//! Implements [`SessionPort`] over the ESP-IDF MQTT client. The client's
//! receive callback does minimal work — it flips the connected flag and
//! copies command-topic payloads into a bounded mailbox; everything else
//! (decode, dispatch) runs from the main loop via `poll_message`.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: simulation backend for host-side tests with
//!   scriptable liveness and message injection.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use heapless::Deque;
use log::{info, warn};

use crate::app::ports::{MessagePayload, SessionPort, MAX_PAYLOAD};
use crate::config::SystemConfig;
use crate::error::CommsError;

/// Inbound messages held between the receive callback and the main loop.
const MAILBOX_CAP: usize = 8;

/// State shared with the client callback. The mutex is held only for a
/// push or pop, never across any I/O.
struct Mailbox {
    connected: AtomicBool,
    inbound: Mutex<Deque<MessagePayload, MAILBOX_CAP>>,
}

impl Mailbox {
    fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            inbound: Mutex::new(Deque::new()),
        }
    }

    fn push(&self, data: &[u8]) {
        if data.len() > MAX_PAYLOAD {
            // Command tokens are tiny; oversized payloads can't decode
            // to anything, so drop them here.
            return;
        }
        let mut payload = MessagePayload::new();
        if payload.extend_from_slice(data).is_err() {
            return;
        }
        let Ok(mut q) = self.inbound.lock() else {
            return;
        };
        if q.push_back(payload).is_err() {
            warn!("MQTT: mailbox full, inbound command dropped");
        }
    }

    fn pop(&self) -> Option<MessagePayload> {
        self.inbound.lock().ok()?.pop_front()
    }
}

pub struct MqttSession {
    command_topic: heapless::String<64>,
    mailbox: Arc<Mailbox>,
    #[cfg(target_os = "espidf")]
    broker_url: heapless::String<96>,
    #[cfg(target_os = "espidf")]
    username: heapless::String<32>,
    #[cfg(target_os = "espidf")]
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    client_id: heapless::String<32>,
    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_publishes: Vec<(std::string::String, Vec<u8>)>,
    #[cfg(not(target_os = "espidf"))]
    sim_subscriptions: Vec<std::string::String>,
    #[cfg(not(target_os = "espidf"))]
    sim_connects: u32,
}

impl MqttSession {
    pub fn new(config: &SystemConfig) -> Self {
        #[cfg(target_os = "espidf")]
        let broker_url = {
            use core::fmt::Write;
            let mut url = heapless::String::new();
            // Fits: scheme + 64-byte host + port.
            let _ = write!(url, "mqtt://{}:{}", config.broker_host, config.broker_port);
            url
        };
        Self {
            command_topic: config.command_topic.clone(),
            mailbox: Arc::new(Mailbox::new()),
            #[cfg(target_os = "espidf")]
            broker_url,
            #[cfg(target_os = "espidf")]
            username: config.broker_username.clone(),
            #[cfg(target_os = "espidf")]
            password: config.broker_password.clone(),
            #[cfg(target_os = "espidf")]
            client_id: config.client_id.clone(),
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_publishes: Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_subscriptions: Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_connects: 0,
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};

        // A fresh attempt replaces any stale client outright.
        self.client = None;
        self.mailbox.connected.store(false, Ordering::Release);

        let cfg = MqttClientConfiguration {
            client_id: Some(self.client_id.as_str()),
            username: (!self.username.is_empty()).then(|| self.username.as_str()),
            password: (!self.password.is_empty()).then(|| self.password.as_str()),
            keep_alive_interval: Some(core::time::Duration::from_secs(60)),
            ..Default::default()
        };

        let mailbox = Arc::clone(&self.mailbox);
        let command_topic: std::string::String = self.command_topic.as_str().into();
        let client = EspMqttClient::new_cb(&self.broker_url, &cfg, move |event| {
            // Callback context: record and return, nothing heavier.
            match event.payload() {
                EventPayload::Connected(_) => {
                    mailbox.connected.store(true, Ordering::Release);
                }
                EventPayload::Disconnected => {
                    mailbox.connected.store(false, Ordering::Release);
                }
                EventPayload::Received { topic, data, .. } => {
                    if topic == Some(command_topic.as_str()) {
                        mailbox.push(data);
                    }
                }
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("MQTT: client init failed — {e}");
            CommsError::SessionConnectFailed
        })?;

        self.client = Some(client);
        info!("MQTT: connect started ({})", self.broker_url);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;
        let client = self.client.as_mut().ok_or(CommsError::SessionDown)?;
        // enqueue() hands off to the client task without blocking.
        client
            .enqueue(topic, QoS::AtLeastOnce, false, payload)
            .map(|_| ())
            .map_err(|_| CommsError::PublishFailed)
    }

    #[cfg(target_os = "espidf")]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;
        let client = self.client.as_mut().ok_or(CommsError::SessionDown)?;
        client
            .subscribe(topic, QoS::AtLeastOnce)
            .map(|_| ())
            .map_err(|_| CommsError::SubscribeFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_connect(&mut self) -> Result<(), CommsError> {
        self.sim_connects += 1;
        info!("MQTT(sim): connect attempt {}", self.sim_connects);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        self.sim_publishes.push((topic.into(), payload.to_vec()));
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        self.sim_subscriptions.push(topic.into());
        Ok(())
    }

    // ── Simulation controls (host tests only) ─────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_connected(&mut self, up: bool) {
        self.mailbox.connected.store(up, Ordering::Release);
    }

    /// Inject an inbound command-topic message, as the broker would.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_receive(&mut self, topic: &str, data: &[u8]) {
        if topic == self.command_topic.as_str() {
            self.mailbox.push(data);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_publishes(&self) -> &[(std::string::String, Vec<u8>)] {
        &self.sim_publishes
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_subscriptions(&self) -> &[std::string::String] {
        &self.sim_subscriptions
    }
}

impl SessionPort for MqttSession {
    fn start_connect(&mut self) -> Result<(), CommsError> {
        self.platform_start_connect()
    }

    fn is_up(&self) -> bool {
        self.mailbox.connected.load(Ordering::Acquire)
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        self.platform_publish(topic, payload)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        self.platform_subscribe(topic)
    }

    fn poll_message(&mut self) -> Option<MessagePayload> {
        self.mailbox.pop()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn command_topic_messages_reach_the_mailbox() {
        let cfg = SystemConfig::default();
        let mut session = MqttSession::new(&cfg);
        session.sim_receive(&cfg.command_topic, b"BEEP");
        let msg = session.poll_message().unwrap();
        assert_eq!(&msg[..], b"BEEP");
        assert!(session.poll_message().is_none());
    }

    #[test]
    fn other_topics_are_filtered_out() {
        let cfg = SystemConfig::default();
        let mut session = MqttSession::new(&cfg);
        session.sim_receive("some/other/topic", b"BEEP");
        assert!(session.poll_message().is_none());
    }

    #[test]
    fn oversized_payloads_are_dropped() {
        let cfg = SystemConfig::default();
        let mut session = MqttSession::new(&cfg);
        let big = [b'x'; MAX_PAYLOAD + 1];
        session.sim_receive(&cfg.command_topic, &big);
        assert!(session.poll_message().is_none());
    }

    #[test]
    fn mailbox_bounds_inbound_backlog() {
        let cfg = SystemConfig::default();
        let mut session = MqttSession::new(&cfg);
        for _ in 0..MAILBOX_CAP + 3 {
            session.sim_receive(&cfg.command_topic, b"BEEP");
        }
        let mut drained = 0;
        while session.poll_message().is_some() {
            drained += 1;
        }
        assert_eq!(drained, MAILBOX_CAP);
    }
}
