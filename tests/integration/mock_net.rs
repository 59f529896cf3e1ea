//! Mock port implementations for integration tests.
//!
//! Every adapter is replaced by a scriptable double that records the full
//! call history, so tests can assert on exactly what hit the "hardware"
//! and the "network" without real GPIO or sockets.

use std::collections::VecDeque;

use doorwatch::app::events::AppEvent;
use doorwatch::app::ports::{
    ActuatorPort, EventSink, LinkPort, MessagePayload, SensorPort, SessionPort,
};
use doorwatch::error::CommsError;

// ── Hardware ──────────────────────────────────────────────────

pub struct MockHardware {
    /// Scripted raw hall level; `None` simulates a read failure.
    pub level: Option<bool>,
    pub buzzer: bool,
    /// Buzzer level changes in order (true = rising edge).
    pub buzzer_edges: Vec<bool>,
    pub led: bool,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            level: Some(true),
            buzzer: false,
            buzzer_edges: Vec::new(),
            led: false,
        }
    }

    /// Toggles recorded since `mark` (an index into `buzzer_edges`).
    pub fn toggles_since(&self, mark: usize) -> usize {
        self.buzzer_edges.len() - mark
    }
}

impl SensorPort for MockHardware {
    fn read_door_level(&mut self) -> Option<bool> {
        self.level
    }
}

impl ActuatorPort for MockHardware {
    fn set_buzzer(&mut self, on: bool) {
        if on != self.buzzer {
            self.buzzer_edges.push(on);
            self.buzzer = on;
        }
    }

    fn set_status_led(&mut self, on: bool) {
        self.led = on;
    }
}

// ── Link ──────────────────────────────────────────────────────

pub struct MockLink {
    pub up: bool,
    pub connects: u32,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            up: false,
            connects: 0,
        }
    }
}

impl LinkPort for MockLink {
    fn start_connect(&mut self) -> Result<(), CommsError> {
        self.connects += 1;
        Ok(())
    }

    fn is_up(&self) -> bool {
        self.up
    }
}

// ── Session ───────────────────────────────────────────────────

pub struct MockSession {
    pub up: bool,
    pub connects: u32,
    pub publishes: Vec<(String, Vec<u8>)>,
    pub subscribes: Vec<String>,
    pub inbound: VecDeque<MessagePayload>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            up: false,
            connects: 0,
            publishes: Vec::new(),
            subscribes: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    /// Queue an inbound command-topic message.
    pub fn receive(&mut self, data: &[u8]) {
        let mut payload = MessagePayload::new();
        payload.extend_from_slice(data).unwrap();
        self.inbound.push_back(payload);
    }
}

impl SessionPort for MockSession {
    fn start_connect(&mut self) -> Result<(), CommsError> {
        self.connects += 1;
        Ok(())
    }

    fn is_up(&self) -> bool {
        self.up
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        self.publishes.push((topic.into(), payload.to_vec()));
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        self.subscribes.push(topic.into());
        Ok(())
    }

    fn poll_message(&mut self) -> Option<MessagePayload> {
        self.inbound.pop_front()
    }
}

// ── Event capture ─────────────────────────────────────────────

pub struct CaptureSink {
    pub events: Vec<AppEvent>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for CaptureSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
