//! Hardware adapter — bridges real GPIO to the domain port traits.
//!
//! Two implementations:
//!
//! - [`GpioDoorIo`] — raw pin numbers through the ESP-IDF GPIO driver
//!   (inert on host; tests override the sensor level directly).
//! - [`HalDigitalIo`] — generic over `embedded-hal` 1.0 digital pins, for
//!   boards wired through a HAL rather than raw pin numbers.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::drivers::status_led::StatusLed;
use crate::error::Result;
use crate::sensors::door;

// ───────────────────────────────────────────────────────────────
// Raw-GPIO adapter
// ───────────────────────────────────────────────────────────────

pub struct GpioDoorIo {
    hall_pin: i32,
    buzzer_pin: i32,
    led: StatusLed,
    buzzer_on: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_level: Option<bool>,
}

impl GpioDoorIo {
    /// Configure the three pins and hook the hall pin's edge interrupt
    /// into the ISR slot; reads nothing yet.
    pub fn new(config: &SystemConfig) -> Result<Self> {
        hw_init::configure_input_pullup(config.hall_pin)?;
        hw_init::attach_door_isr(config.hall_pin)?;
        hw_init::configure_output(config.buzzer_pin)?;
        hw_init::configure_output(config.status_led_pin)?;
        Ok(Self {
            hall_pin: config.hall_pin,
            buzzer_pin: config.buzzer_pin,
            led: StatusLed::new(config.status_led_pin),
            buzzer_on: false,
            #[cfg(not(target_os = "espidf"))]
            sim_level: Some(true),
        })
    }

    /// Set the simulated hall level (`None` = read failure).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_level(&mut self, level: Option<bool>) {
        self.sim_level = level;
    }

    pub fn buzzer_on(&self) -> bool {
        self.buzzer_on
    }

    pub fn status_led_on(&self) -> bool {
        self.led.is_lit()
    }
}

impl SensorPort for GpioDoorIo {
    fn read_door_level(&mut self) -> Option<bool> {
        // An ISR-recorded edge takes priority over the polled level, so a
        // short pulse between polls still lands in the debounce window.
        if let Some(level) = door::take_isr_level() {
            return Some(level);
        }
        #[cfg(target_os = "espidf")]
        {
            hw_init::gpio_read(self.hall_pin)
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.sim_level
        }
    }
}

impl ActuatorPort for GpioDoorIo {
    fn set_buzzer(&mut self, on: bool) {
        if on != self.buzzer_on {
            hw_init::gpio_write(self.buzzer_pin, on);
            self.buzzer_on = on;
        }
    }

    fn set_status_led(&mut self, on: bool) {
        self.led.set(on);
    }
}

// ───────────────────────────────────────────────────────────────
// embedded-hal adapter
// ───────────────────────────────────────────────────────────────

/// Port adapter over any `embedded-hal` 1.0 digital pins.
pub struct HalDigitalIo<I, OB, OL> {
    hall: I,
    buzzer: OB,
    led: OL,
}

impl<I, OB, OL> HalDigitalIo<I, OB, OL>
where
    I: InputPin,
    OB: OutputPin,
    OL: OutputPin,
{
    pub fn new(hall: I, buzzer: OB, led: OL) -> Self {
        Self { hall, buzzer, led }
    }
}

impl<I, OB, OL> SensorPort for HalDigitalIo<I, OB, OL>
where
    I: InputPin,
    OB: OutputPin,
    OL: OutputPin,
{
    fn read_door_level(&mut self) -> Option<bool> {
        self.hall.is_high().ok()
    }
}

impl<I, OB, OL> ActuatorPort for HalDigitalIo<I, OB, OL>
where
    I: InputPin,
    OB: OutputPin,
    OL: OutputPin,
{
    fn set_buzzer(&mut self, on: bool) {
        // A pin that refuses a write cannot be recovered here; the next
        // tick retries anyway.
        let _ = if on {
            self.buzzer.set_high()
        } else {
            self.buzzer.set_low()
        };
    }

    fn set_status_led(&mut self, on: bool) {
        let _ = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
    }
}
