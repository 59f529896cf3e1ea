//! Link-layer connectivity supervisor.
//!
//! Supervises the lower network layer (association + address acquisition)
//! through a [`LinkPort`]. The association procedure itself is a black box
//! behind the port — this state machine only decides *when* to (re)try and
//! tracks observable status for the session supervisor above it.
//!
//! ```text
//!          start() / fallback              is_up()
//!   Down ───────────────────▶ Connecting ───────────▶ Up
//!    ▲                           │     ▲                │
//!    │   burst exhausted         │     └── loss ────────┘
//!    └───────────────────────────┘        (reconnects immediately)
//! ```
//!
//! ## Retry policy
//!
//! Bounded exponential backoff between attempts (2 s doubling, capped at
//! 60 s), at most [`MAX_BURST_ATTEMPTS`] per burst. An exhausted burst
//! drops to `Down`; the fallback timer starts a fresh burst after the
//! configured interval. Loss is detected by the per-tick `is_up()` poll,
//! which reconnects on the same tick it observes the drop.

use log::{info, warn};

use crate::app::ports::LinkPort;

/// Initial delay between connect attempts (ms).
const INITIAL_BACKOFF_MS: u32 = 2_000;
/// Backoff ceiling (ms).
const MAX_BACKOFF_MS: u32 = 60_000;
/// Attempts per connect burst before giving up until the fallback fires.
const MAX_BURST_ATTEMPTS: u32 = 5;

/// Observable link status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Down,
    Connecting,
    Up,
}

pub struct LinkSupervisor {
    status: LinkStatus,
    retry_count: u32,
    burst_attempts: u32,
    backoff_ms: u32,
    last_attempt_ms: u32,
    down_since_ms: u32,
    fallback_ms: u32,
}

impl LinkSupervisor {
    pub fn new(fallback_secs: u32) -> Self {
        Self {
            status: LinkStatus::Down,
            retry_count: 0,
            burst_attempts: 0,
            backoff_ms: INITIAL_BACKOFF_MS,
            last_attempt_ms: 0,
            down_since_ms: 0,
            fallback_ms: fallback_secs.saturating_mul(1_000),
        }
    }

    /// Current status, observable by the session supervisor.
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Total connect attempts since boot.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Kick off the first connect burst at startup.
    pub fn start(&mut self, now_ms: u32, link: &mut impl LinkPort) {
        self.begin_burst(now_ms, link);
    }

    /// Advance the state machine one step. Never blocks; connect attempts
    /// are only started here, never awaited.
    ///
    /// Returns the new status when it changed.
    pub fn tick(&mut self, now_ms: u32, link: &mut impl LinkPort) -> Option<LinkStatus> {
        match self.status {
            LinkStatus::Down => {
                // Fallback liveness: still down after the interval means
                // the last burst ran out; try again.
                if now_ms.wrapping_sub(self.down_since_ms) >= self.fallback_ms {
                    info!("Link: fallback re-trigger after {}ms down", self.fallback_ms);
                    self.begin_burst(now_ms, link);
                    Some(LinkStatus::Connecting)
                } else {
                    None
                }
            }

            LinkStatus::Connecting => {
                if link.is_up() {
                    info!("Link: up after {} attempt(s)", self.burst_attempts);
                    self.status = LinkStatus::Up;
                    self.backoff_ms = INITIAL_BACKOFF_MS;
                    self.burst_attempts = 0;
                    return Some(LinkStatus::Up);
                }
                if now_ms.wrapping_sub(self.last_attempt_ms) >= self.backoff_ms {
                    if self.burst_attempts >= MAX_BURST_ATTEMPTS {
                        warn!(
                            "Link: {} attempts failed, backing off until fallback",
                            self.burst_attempts
                        );
                        self.status = LinkStatus::Down;
                        self.down_since_ms = now_ms;
                        return Some(LinkStatus::Down);
                    }
                    self.attempt(now_ms, link);
                    self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
                }
                None
            }

            LinkStatus::Up => {
                if link.is_up() {
                    None
                } else {
                    warn!("Link: connection lost, reconnecting");
                    self.begin_burst(now_ms, link);
                    Some(LinkStatus::Connecting)
                }
            }
        }
    }

    fn begin_burst(&mut self, now_ms: u32, link: &mut impl LinkPort) {
        self.status = LinkStatus::Connecting;
        self.backoff_ms = INITIAL_BACKOFF_MS;
        self.burst_attempts = 0;
        self.attempt(now_ms, link);
    }

    fn attempt(&mut self, now_ms: u32, link: &mut impl LinkPort) {
        self.retry_count = self.retry_count.wrapping_add(1);
        self.burst_attempts += 1;
        self.last_attempt_ms = now_ms;
        if let Err(e) = link.start_connect() {
            warn!("Link: connect attempt failed to start — {e}");
        }
    }
}
