//! Pacing pulse output driver.
//!
//! Drives the stimulation stand-in (an LED on the demo board) through any
//! `embedded-hal` output pin. Generic over the pin so the ESP32 build
//! hands in a `PinDriver` while host tests hand in a mock.
//!
//! The pulse timer calls into this every iteration, including a forced
//! LOW on every disabled tick, so writes are deduplicated against the
//! last commanded level.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct PaceOutput<P: OutputPin> {
    pin: P,
    high: bool,
}

impl<P: OutputPin> PaceOutput<P> {
    /// Take ownership of the pin and force it LOW.  Pacing must never
    /// start in an asserted state.
    pub fn new(mut pin: P) -> Self {
        if let Err(e) = pin.set_low() {
            warn!("PaceOutput: initial set_low failed ({e:?})");
        }
        Self { pin, high: false }
    }

    pub fn set(&mut self, high: bool) {
        if high == self.high {
            return;
        }
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            // Tracked level follows the physical pin: on a failed write the
            // output kept its old level, so the cached state keeps it too.
            Ok(()) => self.high = high,
            Err(e) => warn!("PaceOutput: pin write failed ({e:?})"),
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}
