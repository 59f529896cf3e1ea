//! Pub/sub session connectivity supervisor.
//!
//! Sits on top of the link supervisor: the session is meaningful only
//! while the link is up and is forced `Down` the instant the link drops.
//! The wire client behind [`SessionPort`] is a black box — this machine
//! owns *when* to connect, when to give up on an attempt, and the
//! resubscribe-on-every-reconnect rule.
//!
//! ## Policy
//!
//! - Liveness compared against `is_up()` every check interval (5 s).
//! - Reconnect attempts are spaced by a bounded backoff (5–10 s) and each
//!   attempt is abandoned after the connect timeout (10 s).
//! - On every transition to `Up` the command topic is (re)subscribed —
//!   subscription state is never assumed durable across reconnects.
//! - `publish` is best-effort: it fails without a transport call unless
//!   the session is up, and nothing is ever queued for later.

use heapless::String;
use log::{info, warn};

use crate::app::ports::SessionPort;
use crate::config::SystemConfig;
use crate::error::CommsError;

/// Observable session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Down,
    Connecting,
    Up,
}

pub struct SessionSupervisor {
    status: SessionStatus,
    subscribed: bool,
    command_topic: String<64>,
    last_check_ms: u32,
    last_attempt_ms: u32,
    attempt_started_ms: u32,
    attempted: bool,
    backoff_ms: u32,
    check_interval_ms: u32,
    retry_min_ms: u32,
    retry_max_ms: u32,
    connect_timeout_ms: u32,
}

impl SessionSupervisor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            status: SessionStatus::Down,
            subscribed: false,
            command_topic: config.command_topic.clone(),
            last_check_ms: 0,
            last_attempt_ms: 0,
            attempt_started_ms: 0,
            attempted: false,
            backoff_ms: config.session_retry_min_ms,
            check_interval_ms: config.session_check_interval_ms,
            retry_min_ms: config.session_retry_min_ms,
            retry_max_ms: config.session_retry_max_ms,
            connect_timeout_ms: config.session_connect_timeout_ms,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the command-topic subscription is currently believed live.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Advance the state machine one step. `link_up` is the link
    /// supervisor's current observation; a down link forces the session
    /// down on the spot, regardless of what the client claims.
    ///
    /// Returns the new status when it changed.
    pub fn tick(
        &mut self,
        now_ms: u32,
        link_up: bool,
        session: &mut impl SessionPort,
    ) -> Option<SessionStatus> {
        if !link_up {
            if self.status != SessionStatus::Down {
                warn!("Session: link down, forcing session down");
                self.status = SessionStatus::Down;
                self.subscribed = false;
                return Some(SessionStatus::Down);
            }
            return None;
        }

        match self.status {
            SessionStatus::Down => {
                // First attempt fires immediately; later ones wait out the
                // backoff left over from previous failures.
                if !self.attempted
                    || now_ms.wrapping_sub(self.last_attempt_ms) >= self.backoff_ms
                {
                    self.begin_connect(now_ms, session);
                    Some(SessionStatus::Connecting)
                } else {
                    None
                }
            }

            SessionStatus::Connecting => {
                if session.is_up() {
                    info!("Session: up, (re)subscribing to command topic");
                    self.status = SessionStatus::Up;
                    self.backoff_ms = self.retry_min_ms;
                    self.subscribed = false;
                    self.try_subscribe(session);
                    return Some(SessionStatus::Up);
                }
                // Abandon the attempt after its timeout, then retry once
                // the backoff elapses.
                let since_attempt = now_ms.wrapping_sub(self.attempt_started_ms);
                if since_attempt >= self.connect_timeout_ms
                    && now_ms.wrapping_sub(self.last_attempt_ms) >= self.backoff_ms
                {
                    warn!("Session: connect attempt timed out, retrying");
                    self.bump_backoff();
                    self.begin_connect(now_ms, session);
                }
                None
            }

            SessionStatus::Up => {
                // Subscribe may have failed on the way up; keep retrying
                // until it sticks, since commands are inert without it.
                if !self.subscribed {
                    self.try_subscribe(session);
                }
                if now_ms.wrapping_sub(self.last_check_ms) >= self.check_interval_ms {
                    self.last_check_ms = now_ms;
                    if !session.is_up() {
                        warn!("Session: liveness check failed while link up");
                        self.status = SessionStatus::Down;
                        self.subscribed = false;
                        return Some(SessionStatus::Down);
                    }
                }
                None
            }
        }
    }

    /// Best-effort publish. Fails with no transport call whenever the
    /// session is not up; never blocks beyond the transport's own bound
    /// and never queues for later delivery.
    pub fn publish(
        &mut self,
        session: &mut impl SessionPort,
        topic: &str,
        payload: &[u8],
    ) -> Result<(), CommsError> {
        if self.status != SessionStatus::Up {
            return Err(CommsError::SessionDown);
        }
        session.publish(topic, payload)
    }

    fn begin_connect(&mut self, now_ms: u32, session: &mut impl SessionPort) {
        self.status = SessionStatus::Connecting;
        self.attempted = true;
        self.last_attempt_ms = now_ms;
        self.attempt_started_ms = now_ms;
        self.last_check_ms = now_ms;
        if let Err(e) = session.start_connect() {
            warn!("Session: connect attempt failed to start — {e}");
        }
    }

    fn bump_backoff(&mut self) {
        self.backoff_ms = (self.backoff_ms.saturating_mul(2)).min(self.retry_max_ms);
    }

    fn try_subscribe(&mut self, session: &mut impl SessionPort) {
        match session.subscribe(&self.command_topic) {
            Ok(()) => {
                info!("Session: subscribed to '{}'", self.command_topic);
                self.subscribed = true;
            }
            Err(e) => warn!("Session: subscribe failed — {e}"),
        }
    }
}
