//! Link status LED driver.
//!
//! A single discrete LED on a plain GPIO: lit while the MQTT session is
//! up, dark otherwise. The control loop mirrors the link state into it on
//! every iteration, so `set()` skips the register write when nothing
//! changed.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct StatusLed {
    lit: bool,
}

impl StatusLed {
    pub fn new() -> Self {
        hw_init::gpio_write(pins::STATUS_LED_GPIO, false);
        Self { lit: false }
    }

    pub fn set(&mut self, lit: bool) {
        if lit != self.lit {
            hw_init::gpio_write(pins::STATUS_LED_GPIO, lit);
            self.lit = lit;
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_level_changes() {
        let mut led = StatusLed::new();
        assert!(!led.is_lit());
        led.set(true);
        assert!(led.is_lit());
        led.set(true);
        assert!(led.is_lit());
        led.set(false);
        assert!(!led.is_lit());
    }
}
