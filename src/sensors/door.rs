//! Debounced hall-sensor door monitor.
//!
//! ## Hardware
//!
//! A3144 hall-effect sensor with external pull-up: HIGH = no magnet (door
//! open), LOW = magnet present (door closed). The GPIO ISR records the raw
//! level into an atomic slot; all debounce logic runs from `tick()` in the
//! main loop.
//!
//! ## Debounce
//!
//! A tentative level must hold unbroken for the full debounce window
//! before it is promoted to the confirmed [`DoorState`]. A contradicting
//! observation inside the window drops the tentative level without a
//! reported transition, and exactly one event is emitted per promotion.

use core::sync::atomic::{AtomicU8, Ordering};

use log::info;

/// Confirmed door position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    /// Map a raw sensor level to the state it implies.
    pub fn from_level(level: bool) -> Self {
        if level {
            Self::Open
        } else {
            Self::Closed
        }
    }

    /// Wire token published on the status topic.
    pub fn payload(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

/// Raw level last seen by the GPIO ISR: 0 = no sample, 1 = low, 2 = high.
/// Written by the ISR, consumed by the main loop.
static DOOR_ISR_LEVEL: AtomicU8 = AtomicU8::new(0);

/// ISR handler — registered on the hall GPIO any-edge interrupt by
/// `hw_init::attach_door_isr`. Safe to call from interrupt context
/// (lock-free atomic store). The slot holds only the latest level;
/// debounce runs in the main loop.
pub fn door_isr_handler(level: bool) {
    DOOR_ISR_LEVEL.store(if level { 2 } else { 1 }, Ordering::Release);
}

/// Serialises tests that touch the process-global ISR slot.
#[cfg(test)]
pub(crate) fn isr_slot_guard() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Consume the latest ISR-recorded level, if one arrived since last call.
pub fn take_isr_level() -> Option<bool> {
    match DOOR_ISR_LEVEL.swap(0, Ordering::AcqRel) {
        1 => Some(false),
        2 => Some(true),
        _ => None,
    }
}

/// Dwell tracking for a level that contradicts the confirmed state.
#[derive(Debug, Clone, Copy)]
struct Tentative {
    level: bool,
    since_ms: u32,
}

pub struct DoorMonitor {
    confirmed: DoorState,
    tentative: Option<Tentative>,
    window_ms: u32,
}

impl DoorMonitor {
    /// `initial_level` seeds the confirmed state from the first hardware
    /// read at boot, so power-up never reports a spurious transition.
    pub fn new(initial_level: bool, window_ms: u32) -> Self {
        Self {
            confirmed: DoorState::from_level(initial_level),
            tentative: None,
            window_ms,
        }
    }

    /// Current confirmed state. Mutated only by a completed debounce.
    pub fn state(&self) -> DoorState {
        self.confirmed
    }

    /// Feed one raw sample. `raw == None` (hardware read failure) is
    /// indistinguishable from a stable level: no observation, no event.
    ///
    /// Returns the new confirmed state exactly once per promotion.
    pub fn tick(&mut self, now_ms: u32, raw: Option<bool>) -> Option<DoorState> {
        let level = raw?;

        if DoorState::from_level(level) == self.confirmed {
            // Back at the confirmed level — any pending dwell was noise.
            self.tentative = None;
            return None;
        }

        match self.tentative {
            None => {
                self.tentative = Some(Tentative {
                    level,
                    since_ms: now_ms,
                });
                None
            }
            Some(t) => {
                if now_ms.wrapping_sub(t.since_ms) >= self.window_ms {
                    self.confirmed = DoorState::from_level(t.level);
                    self.tentative = None;
                    info!("Door: confirmed {:?}", self.confirmed);
                    Some(self.confirmed)
                } else {
                    None
                }
            }
        }
    }
}
