//! Non-blocking buzzer alert sequencer.
//!
//! A beep sequence of `n` beeps is `2n` output toggles: the buzzer goes
//! high (toggle 1), low (toggle 2), high, … and always ends low. The
//! sequencer is a two-state machine driven by `tick()` from the main loop
//! — no delays, no tasks, so a hung transport elsewhere can never stall
//! it and it can never stall sensor polling.
//!
//! ```text
//!              start(n, d)            remaining == 0 | stop()
//!   Inactive ──────────────▶ Active ──────────────────────────▶ Inactive
//!      ▲                       │ tick: elapsed >= d → flip output
//!      └───────────────────────┘
//! ```
//!
//! `start` is idempotent-preemptive: an active sequence is abandoned
//! outright in favour of the new one, with no overlap of output levels.

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeqState {
    Inactive,
    Active {
        /// Toggles left, counting the initial rise as the first.
        remaining: u32,
        /// Time of the last toggle.
        last_toggle_ms: u32,
    },
}

pub struct AlertSequencer {
    state: SeqState,
    toggle_duration_ms: u32,
    output_level: bool,
}

impl AlertSequencer {
    pub fn new() -> Self {
        Self {
            state: SeqState::Inactive,
            toggle_duration_ms: 0,
            output_level: false,
        }
    }

    /// Arm a sequence of `times` beeps with `duration_ms` half-cycles.
    /// Any active sequence is discarded; the output is forced high as the
    /// first toggle of the new one.
    pub fn start(&mut self, now_ms: u32, times: u16, duration_ms: u32) {
        if times == 0 || duration_ms == 0 {
            self.stop();
            return;
        }
        // 2*times toggles total; the rise below consumes the first. Wider
        // than u16 so the doubling cannot overflow.
        self.state = SeqState::Active {
            remaining: u32::from(times) * 2 - 1,
            last_toggle_ms: now_ms,
        };
        self.toggle_duration_ms = duration_ms;
        self.output_level = true;
        info!("Buzzer: sequence armed ({} x {}ms)", times, duration_ms);
    }

    /// Silence immediately: output low, state inactive, regardless of
    /// remaining toggles.
    pub fn stop(&mut self) {
        if self.state != SeqState::Inactive {
            info!("Buzzer: stopped");
        }
        self.state = SeqState::Inactive;
        self.output_level = false;
    }

    /// Advance the sequence. Non-blocking; call at high frequency
    /// (at least twice per half-cycle).
    pub fn tick(&mut self, now_ms: u32) {
        let SeqState::Active {
            remaining,
            last_toggle_ms,
        } = self.state
        else {
            return;
        };

        if now_ms.wrapping_sub(last_toggle_ms) < self.toggle_duration_ms {
            return;
        }

        self.output_level = !self.output_level;
        let remaining = remaining - 1;
        if remaining == 0 {
            // The final toggle always lands low; force it anyway so the
            // invariant holds even if a caller desynced the level.
            self.state = SeqState::Inactive;
            self.output_level = false;
            info!("Buzzer: sequence completed");
        } else {
            self.state = SeqState::Active {
                remaining,
                last_toggle_ms: now_ms,
            };
        }
    }

    /// Current commanded output level. Low whenever inactive.
    pub fn output_level(&self) -> bool {
        self.output_level
    }

    pub fn is_active(&self) -> bool {
        self.state != SeqState::Inactive
    }
}
