//! End-to-end scenarios through the full AppService pipeline:
//! raw sensor levels in, publishes / buzzer edges / events out.

use doorwatch::app::events::AppEvent;
use doorwatch::app::service::AppService;
use doorwatch::config::SystemConfig;
use doorwatch::sensors::door::DoorState;

use crate::mock_net::{CaptureSink, MockHardware, MockLink, MockSession};

/// Test rig stepping the whole system at the configured 10ms tick.
pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub link: MockLink,
    pub session: MockSession,
    pub sink: CaptureSink,
    pub now: u32,
}

impl Rig {
    /// Boot with the door open (hall level high) and nothing connected.
    pub fn new() -> Self {
        let config = SystemConfig::default();
        let mut link = MockLink::new();
        let mut sink = CaptureSink::new();
        let mut app = AppService::new(config, true);
        app.start(0, &mut link, &mut sink);
        Self {
            app,
            hw: MockHardware::new(),
            link,
            session: MockSession::new(),
            sink,
            now: 0,
        }
    }

    pub fn step(&mut self) {
        self.now += 10;
        self.app.tick(
            self.now,
            &mut self.hw,
            &mut self.link,
            &mut self.session,
            &mut self.sink,
        );
    }

    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms / 10 {
            self.step();
        }
    }

    /// Bring link and session up and let the supervisors settle.
    pub fn bring_online(&mut self) {
        self.link.up = true;
        self.session.up = true;
        self.run_ms(50);
        assert_eq!(self.session.subscribes.len(), 1, "subscribed on first up");
    }

    pub fn door_changes(&self) -> usize {
        self.sink
            .count(|e| matches!(e, AppEvent::DoorChanged { .. }))
    }
}

// ── Debounced transitions ─────────────────────────────────────

#[test]
fn held_low_level_produces_one_transition_publish_and_alert() {
    let mut rig = Rig::new();
    rig.bring_online();

    // Stable high: nothing happens.
    rig.run_ms(200);
    assert_eq!(rig.door_changes(), 0);
    assert!(rig.session.publishes.is_empty());

    // Drop the level and hold it.
    rig.hw.level = Some(false);
    let edge_mark = rig.hw.buzzer_edges.len();
    rig.run_ms(150);

    // Exactly one confirmed Closed transition.
    assert_eq!(rig.door_changes(), 1);
    assert_eq!(rig.app.door_state(), DoorState::Closed);

    // Exactly one publish attempt carrying the CLOSED token.
    assert_eq!(rig.session.publishes.len(), 1);
    let (topic, payload) = &rig.session.publishes[0];
    assert_eq!(topic, "esp32/lock/state");
    assert_eq!(payload.as_slice(), b"CLOSED");

    // Default alert armed: 3 beeps = 6 toggles at 200ms, ending low.
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::AlertStarted {
                times: 3,
                duration_ms: 200
            }
        )),
        1
    );
    rig.run_ms(1_500);
    assert_eq!(rig.hw.toggles_since(edge_mark), 6);
    assert!(!rig.hw.buzzer, "buzzer must end low");
    assert!(!rig.app.alert_active());

    // Still exactly one transition after the dust settles.
    assert_eq!(rig.door_changes(), 1);
    assert_eq!(rig.session.publishes.len(), 1);
}

#[test]
fn glitch_shorter_than_window_is_invisible() {
    let mut rig = Rig::new();
    rig.bring_online();

    rig.hw.level = Some(false);
    rig.run_ms(50); // below the 100ms window
    rig.hw.level = Some(true);
    rig.run_ms(500);

    assert_eq!(rig.door_changes(), 0);
    assert!(rig.session.publishes.is_empty());
    assert!(rig.hw.buzzer_edges.is_empty());
}

// ── Remote commands ───────────────────────────────────────────

#[test]
fn beep_command_replaces_active_sequence() {
    let mut rig = Rig::new();
    rig.bring_online();

    // Door transition arms the 3x200ms default alert.
    rig.hw.level = Some(false);
    rig.run_ms(150);
    assert!(rig.app.alert_active());

    // Remote BEEP lands mid-sequence.
    let edge_mark = rig.hw.buzzer_edges.len();
    rig.session.receive(b"BEEP");
    rig.step();
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::AlertStarted {
                times: 5,
                duration_ms: 300
            }
        )),
        1
    );
    assert!(rig.hw.buzzer, "replacement sequence starts output-high");

    // The replacement runs its full 10 toggles and ends low.
    rig.run_ms(3_500);
    assert!(!rig.app.alert_active());
    assert!(!rig.hw.buzzer);
    // The pin was already high when the replacement re-asserted high, so
    // its first toggle leaves no edge; the remaining 9 flips all do, with
    // no overlap from the discarded sequence.
    let edges = &rig.hw.buzzer_edges[edge_mark..];
    assert_eq!(edges.len(), 9);
    assert!(!edges[0], "first visible edge of the replacement is falling");
}

#[test]
fn stop_command_silences_within_one_tick() {
    let mut rig = Rig::new();
    rig.bring_online();

    rig.hw.level = Some(false);
    rig.run_ms(150);
    assert!(rig.app.alert_active());

    rig.session.receive(b"STOP");
    rig.step();
    assert!(!rig.app.alert_active());
    assert!(!rig.hw.buzzer, "output forced low on the stop tick");
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlertStopped)), 1);
}

#[test]
fn unknown_command_payloads_are_ignored() {
    let mut rig = Rig::new();
    rig.bring_online();

    rig.session.receive(b"REBOOT");
    rig.session.receive(b"beep");
    rig.run_ms(100);
    assert!(!rig.app.alert_active());
    assert!(rig.hw.buzzer_edges.is_empty());
}

// ── Best-effort publish policy ────────────────────────────────

#[test]
fn transition_while_offline_drops_publish_but_still_beeps() {
    let mut rig = Rig::new(); // never brought online

    rig.hw.level = Some(false);
    rig.run_ms(150);

    assert_eq!(rig.door_changes(), 1);
    assert!(
        rig.session.publishes.is_empty(),
        "no transport call while the session is down"
    );
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::Published { ok: false, .. })),
        1
    );
    // The local alert is unconditional.
    assert!(rig.sink.count(|e| matches!(e, AppEvent::AlertStarted { .. })) == 1);

    // The dropped transition is never re-queued, even once connectivity
    // returns.
    rig.bring_online();
    rig.run_ms(500);
    assert!(rig.session.publishes.is_empty());
}

#[test]
fn status_led_mirrors_session_liveness() {
    let mut rig = Rig::new();
    assert!(!rig.hw.led);
    rig.bring_online();
    assert!(rig.hw.led);

    rig.link.up = false;
    rig.run_ms(30);
    assert!(!rig.hw.led);
}
