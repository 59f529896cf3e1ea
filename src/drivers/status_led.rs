//! Connectivity status LED driver.
//!
//! Lit while the pub/sub session is up, dark otherwise — the only visual
//! indicator on the board.
//!
//! On ESP-IDF this drives a GPIO via hw_init; on host/test it tracks
//! state in-memory only.

use crate::drivers::hw_init;

pub struct StatusLed {
    pin: i32,
    lit: bool,
}

impl StatusLed {
    pub fn new(pin: i32) -> Self {
        Self { pin, lit: false }
    }

    pub fn set(&mut self, on: bool) {
        if on != self.lit {
            hw_init::gpio_write(self.pin, on);
            self.lit = on;
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_commanded_state() {
        let mut led = StatusLed::new(2);
        assert!(!led.is_lit());
        led.set(true);
        assert!(led.is_lit());
        led.set(true);
        assert!(led.is_lit());
        led.set(false);
        assert!(!led.is_lit());
    }
}
