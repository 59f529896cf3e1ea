//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the debounced door monitor, the alert sequencer,
//! the command dispatcher and both connectivity supervisors. All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  SessionPort ◀──│         AppService           │
//!  LinkPort ◀─────│ monitor · sequencer · links  │
//! ActuatorPort ◀──└──────────────────────────────┘
//! ```
//!
//! Every `tick` drives each component exactly once and none of them may
//! block: publishes are fire-and-forget and connect attempts are only
//! started, never awaited, so a hung transport can never stall sensor
//! polling or a running beep sequence.

use log::info;

use crate::config::SystemConfig;
use crate::drivers::buzzer::AlertSequencer;
use crate::net::link::{LinkStatus, LinkSupervisor};
use crate::net::session::{SessionStatus, SessionSupervisor};
use crate::sensors::door::{DoorMonitor, DoorState};

use super::commands::{CommandDispatcher, InboundCommand};
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, LinkPort, SensorPort, SessionPort};

/// The application service orchestrates all domain logic.
pub struct AppService {
    monitor: DoorMonitor,
    sequencer: AlertSequencer,
    link: LinkSupervisor,
    session: SessionSupervisor,
    dispatcher: CommandDispatcher,
    config: SystemConfig,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration. `initial_level` is the
    /// raw sensor level read once at boot; it seeds the confirmed door
    /// state so power-up never looks like a transition.
    pub fn new(config: SystemConfig, initial_level: bool) -> Self {
        Self {
            monitor: DoorMonitor::new(initial_level, config.debounce_window_ms),
            sequencer: AlertSequencer::new(),
            link: LinkSupervisor::new(config.link_fallback_secs),
            session: SessionSupervisor::new(&config),
            dispatcher: CommandDispatcher::new(&config),
            config,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Kick off the first link connect burst and report the boot state.
    pub fn start(&mut self, now_ms: u32, link: &mut impl LinkPort, sink: &mut impl EventSink) {
        self.link.start(now_ms, link);
        sink.emit(&AppEvent::Started(self.monitor.state()));
        info!("AppService started, door {:?}", self.monitor.state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle: supervisors → sensor debounce → publish/alert
    /// on transition → inbound commands → sequencer → output mirroring.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl LinkPort,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Connectivity supervisors. The session sees the link status
        //    from this same tick, so a link drop forces it down at once.
        if let Some(s) = self.link.tick(now_ms, link) {
            sink.emit(&AppEvent::LinkStatus(s));
        }
        let link_up = self.link.status() == LinkStatus::Up;
        if let Some(s) = self.session.tick(now_ms, link_up, session) {
            sink.emit(&AppEvent::SessionStatus(s));
        }

        // 2. Door sensor debounce.
        let from = self.monitor.state();
        if let Some(to) = self.monitor.tick(now_ms, hw.read_door_level()) {
            sink.emit(&AppEvent::DoorChanged { from, to });
            self.publish_state(session, to, sink);
            // Local alert regardless of publish outcome.
            self.start_alert(
                now_ms,
                self.config.default_beep_times,
                self.config.default_beep_duration_ms,
                sink,
            );
        }

        // 3. Inbound commands (already filtered to the command topic by
        //    the adapter; decode failures are silently ignored). The
        //    mailbox is drained even while the session is down so stale
        //    messages cannot fire after a reconnect; commands are only
        //    accepted from a live, resubscribed session.
        while let Some(payload) = session.poll_message() {
            if self.session.status() != SessionStatus::Up {
                continue;
            }
            match self.dispatcher.decode(&payload) {
                Some(InboundCommand::Beep { times, duration_ms }) => {
                    self.start_alert(now_ms, times, duration_ms, sink);
                }
                Some(InboundCommand::Stop) => {
                    self.sequencer.stop();
                    sink.emit(&AppEvent::AlertStopped);
                }
                None => {}
            }
        }

        // 4. Alert sequencer, then mirror its level onto the pin. The pin
        //    tracks the sequencer unconditionally, so it is forced low
        //    the moment a sequence retires.
        self.sequencer.tick(now_ms);
        hw.set_buzzer(self.sequencer.output_level());

        // 5. Status LED shows pub/sub session liveness.
        hw.set_status_led(self.session.status() == SessionStatus::Up);
    }

    fn publish_state(
        &mut self,
        session: &mut impl SessionPort,
        state: DoorState,
        sink: &mut impl EventSink,
    ) {
        // Best-effort: a down session or transport refusal drops the
        // message with no queueing and no retry.
        let ok = self
            .session
            .publish(session, &self.config.status_topic, state.payload().as_bytes())
            .is_ok();
        sink.emit(&AppEvent::Published { state, ok });
    }

    fn start_alert(&mut self, now_ms: u32, times: u16, duration_ms: u32, sink: &mut impl EventSink) {
        self.sequencer.start(now_ms, times, duration_ms);
        sink.emit(&AppEvent::AlertStarted { times, duration_ms });
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn door_state(&self) -> DoorState {
        self.monitor.state()
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link.status()
    }

    pub fn session_status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn alert_active(&self) -> bool {
        self.sequencer.is_active()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
