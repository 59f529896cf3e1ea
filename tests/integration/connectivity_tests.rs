//! Layered-connectivity scenarios: link drops, session recovery and the
//! resubscribe rule, all driven through the full AppService tick loop.

use doorwatch::app::events::AppEvent;
use doorwatch::net::link::LinkStatus;
use doorwatch::net::session::SessionStatus;

use crate::orchestrator_tests::Rig;

#[test]
fn link_drop_forces_session_down_on_the_same_tick() {
    let mut rig = Rig::new();
    rig.bring_online();

    // The transport still claims to be connected; the link observation
    // wins anyway.
    rig.link.up = false;
    rig.step();
    assert_eq!(rig.app.session_status(), SessionStatus::Down);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SessionStatus(SessionStatus::Down))),
        1
    );
}

#[test]
fn commands_during_an_outage_are_discarded_not_deferred() {
    let mut rig = Rig::new();
    rig.bring_online();

    rig.link.up = false;
    rig.step();
    assert_eq!(rig.app.session_status(), SessionStatus::Down);

    // A stale command sitting in the mailbox must not fire, now or after
    // the session comes back.
    rig.session.receive(b"BEEP");
    rig.run_ms(30);
    assert!(!rig.app.alert_active());

    rig.link.up = true;
    rig.run_ms(10_000); // session backoff + reconnect
    assert_eq!(rig.app.session_status(), SessionStatus::Up);
    assert!(!rig.app.alert_active(), "stale command never replayed");
    assert!(rig.hw.buzzer_edges.is_empty());
}

#[test]
fn recovery_redoes_connect_and_resubscribe_before_accepting_commands() {
    let mut rig = Rig::new();
    rig.bring_online();
    assert_eq!(rig.session.connects, 1);
    assert_eq!(rig.session.subscribes.len(), 1);

    // Full outage: link and transport both gone.
    rig.link.up = false;
    rig.session.up = false;
    rig.run_ms(30);
    assert_eq!(rig.app.session_status(), SessionStatus::Down);

    // Both layers recover; the session waits out its backoff, then must
    // go through a fresh connect and a fresh subscribe.
    rig.link.up = true;
    rig.session.up = true;
    rig.run_ms(10_000);
    assert_eq!(rig.app.session_status(), SessionStatus::Up);
    assert_eq!(rig.session.connects, 2, "state from before the drop is not reused");
    assert_eq!(rig.session.subscribes.len(), 2, "subscription redone");

    // Only now are inbound commands live again.
    rig.session.receive(b"BEEP");
    rig.step();
    assert!(rig.app.alert_active());
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
}

#[test]
fn session_never_comes_up_while_link_is_down() {
    let mut rig = Rig::new();
    rig.session.up = true; // transport lies; the link never associated
    rig.run_ms(1_000);

    assert_eq!(rig.app.session_status(), SessionStatus::Down);
    assert_eq!(rig.session.connects, 0, "no attempt without a link");
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SessionStatus(SessionStatus::Up))),
        0
    );
    assert!(!rig.hw.led);
}

#[test]
fn link_burst_exhausts_then_fallback_retriggers() {
    let mut rig = Rig::new(); // link never comes up

    // Attempts at 0s, 2s, 6s, 14s and 30s; the next slot (62s) finds
    // the burst exhausted and drops the link supervisor to Down.
    rig.run_ms(62_000);
    assert_eq!(rig.link.connects, 5);
    assert_eq!(rig.app.link_status(), LinkStatus::Down);

    // The 60s fallback starts a fresh burst.
    rig.run_ms(60_000);
    assert_eq!(rig.link.connects, 6);
    assert_eq!(rig.app.link_status(), LinkStatus::Connecting);
}

#[test]
fn session_liveness_loss_is_reflected_within_one_check_interval() {
    let mut rig = Rig::new();
    rig.bring_online();
    assert!(rig.hw.led);

    // Link stays up but the transport silently dies.
    rig.session.up = false;
    rig.run_ms(5_200);
    assert_ne!(rig.app.session_status(), SessionStatus::Up);
    assert!(!rig.hw.led, "LED follows the session, not the link");
}
